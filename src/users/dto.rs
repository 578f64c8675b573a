use serde::Serialize;

use super::repo_types::{PublicUser, UserProfile};

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse<T> {
    pub messages: Vec<T>,
}
