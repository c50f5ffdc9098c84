use reqwest::Method;

use crate::api::{endpoints, RequestClient, RequestError};
use crate::models::{LikeStatus, LikedItem};

impl RequestClient {
    pub async fn like_post(&self, post_id: i64) -> Result<(), RequestError> {
        self.execute(&endpoints::post_likes(post_id), Method::POST, None::<&()>, None)
            .await?;
        Ok(())
    }

    pub async fn unlike_post(&self, post_id: i64) -> Result<(), RequestError> {
        self.delete(&endpoints::post_likes(post_id)).await?;
        Ok(())
    }

    /// Flip the like on a post. Returns whether the post is now liked.
    pub async fn toggle_post_like(&self, post_id: i64) -> Result<bool, RequestError> {
        self.send_json(Method::PUT, &endpoints::post_like_toggle(post_id), None::<&()>)
            .await
    }

    pub async fn fetch_post_like_status(&self, post_id: i64) -> Result<LikeStatus, RequestError> {
        self.get_json(&endpoints::post_like_count(post_id)).await
    }

    pub async fn fetch_liked_posts(&self, member_id: i64) -> Result<Vec<LikedItem>, RequestError> {
        self.get_json(&endpoints::post_likes_by_member(member_id))
            .await
    }

    pub async fn like_comment(&self, comment_id: i64) -> Result<(), RequestError> {
        self.execute(
            &endpoints::comment_likes(comment_id),
            Method::POST,
            None::<&()>,
            None,
        )
        .await?;
        Ok(())
    }

    pub async fn unlike_comment(&self, comment_id: i64) -> Result<(), RequestError> {
        self.delete(&endpoints::comment_likes(comment_id)).await?;
        Ok(())
    }

    /// Flip the like on a comment. Returns whether the comment is now liked.
    pub async fn toggle_comment_like(&self, comment_id: i64) -> Result<bool, RequestError> {
        self.send_json(
            Method::PUT,
            &endpoints::comment_like_toggle(comment_id),
            None::<&()>,
        )
        .await
    }

    pub async fn fetch_comment_like_status(
        &self,
        comment_id: i64,
    ) -> Result<LikeStatus, RequestError> {
        self.get_json(&endpoints::comment_like_count(comment_id))
            .await
    }

    pub async fn fetch_liked_comments(
        &self,
        member_id: i64,
    ) -> Result<Vec<LikedItem>, RequestError> {
        self.get_json(&endpoints::comment_likes_by_member(member_id))
            .await
    }
}
