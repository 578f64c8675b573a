use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, users::repo_types::NewUser};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        let username = self.username.trim().to_string();
        if !is_valid_username(&username) {
            return Err(AppError::Validation("Invalid username".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation("Password too short".into()));
        }

        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("phone", &self.phone),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AppError::Validation(format!("{field} is required")));
        }

        Ok(NewUser {
            username,
            password: self.password,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
        })
    }
}
