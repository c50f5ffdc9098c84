use serde::{Deserialize, Serialize};

/// Like count for a post or comment, and whether the current member liked it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LikeStatus {
    #[serde(rename = "likeCount", default)]
    pub like_count: i64,
    #[serde(rename = "isLiked", alias = "liked", default)]
    pub is_liked: bool,
}

/// Entry in a member's liked posts or liked comments list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedItem {
    pub id: i64,
    #[serde(rename = "postId", default)]
    pub post_id: Option<i64>,
    #[serde(rename = "commentId", default)]
    pub comment_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_like_status() {
        let status: LikeStatus =
            serde_json::from_str(r#"{"commentId":5,"likeCount":3,"isLiked":true}"#).unwrap();
        assert_eq!(status.like_count, 3);
        assert!(status.is_liked);

        let status: LikeStatus = serde_json::from_str(r#"{"likeCount":0}"#).unwrap();
        assert!(!status.is_liked);
    }
}
