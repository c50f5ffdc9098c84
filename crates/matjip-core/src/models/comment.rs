use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "postId", default)]
    pub post_id: Option<i64>,
    pub content: String,
    #[serde(rename = "memberId", default)]
    pub member_id: Option<i64>,
    #[serde(rename = "memberNickname", default)]
    pub member_nickname: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(rename = "likeCount", default)]
    pub like_count: i64,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl Comment {
    /// Author to show; deleted or anonymous comments fall back to a placeholder.
    pub fn author_display(&self) -> &str {
        self.member_nickname.as_deref().unwrap_or("anonymous")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentDraft {
    pub content: String,
}
