use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::auth::schema::AdminRole;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginModel {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub role: AdminRole,
    pub expires_in: u64,
}
