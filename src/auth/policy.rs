use tracing::warn;

use crate::error::AppError;

/// Anything that has a sender and a recipient.
pub trait Parties {
    fn sender(&self) -> &str;
    fn recipient(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Sender or recipient.
    Participant,
    Recipient,
}

impl Capability {
    pub fn allows<P: Parties + ?Sized>(self, caller: &str, target: &P) -> bool {
        match self {
            Capability::Participant => caller == target.sender() || caller == target.recipient(),
            Capability::Recipient => caller == target.recipient(),
        }
    }
}

pub fn authorize<P: Parties + ?Sized>(
    caller: &str,
    capability: Capability,
    target: &P,
) -> Result<(), AppError> {
    if capability.allows(caller, target) {
        return Ok(());
    }
    warn!(%caller, ?capability, "access denied");
    Err(AppError::Unauthorized)
}
