use serde::{Deserialize, Serialize};

use crate::auth::Session;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub email: Option<String>,
    pub nickname: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    pub member: Member,
}

impl LoginResponse {
    /// Every session field, written at once after a successful login.
    pub fn to_session(&self) -> Session {
        Session {
            member_id: Some(self.member.id.to_string()),
            access_token: Some(self.access_token.clone()),
            refresh_token: Some(self.refresh_token.clone()),
            nickname: Some(self.member.nickname.clone()),
            email: self.member.email.clone(),
            profile_image: self.member.profile_image.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    #[serde(rename = "profileImage", skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Partial profile update; `None` fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "profileImage", skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
