use reqwest::Method;

use crate::api::{endpoints, RequestClient, RequestError};
use crate::models::{Comment, CommentDraft};

impl RequestClient {
    pub async fn fetch_comments(&self, post_id: i64) -> Result<Vec<Comment>, RequestError> {
        self.get_json(&endpoints::comments(post_id)).await
    }

    pub async fn create_comment(
        &self,
        post_id: i64,
        content: &str,
    ) -> Result<Comment, RequestError> {
        let draft = CommentDraft {
            content: content.to_string(),
        };
        self.send_json(Method::POST, &endpoints::comments(post_id), Some(&draft))
            .await
    }

    pub async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        content: &str,
    ) -> Result<Comment, RequestError> {
        let draft = CommentDraft {
            content: content.to_string(),
        };
        self.send_json(
            Method::PUT,
            &endpoints::comment(post_id, comment_id),
            Some(&draft),
        )
        .await
    }

    pub async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<(), RequestError> {
        self.delete(&endpoints::comment(post_id, comment_id)).await?;
        Ok(())
    }

    pub async fn fetch_comments_by_member(
        &self,
        member_id: i64,
    ) -> Result<Vec<Comment>, RequestError> {
        self.get_json(&endpoints::comments_by_member(member_id))
            .await
    }
}
