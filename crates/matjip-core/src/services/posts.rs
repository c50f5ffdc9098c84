use reqwest::Method;

use crate::api::{endpoints, RequestClient, RequestError};
use crate::models::{FoodCategory, Post, PostDraft};

impl RequestClient {
    pub async fn fetch_posts(&self) -> Result<Vec<Post>, RequestError> {
        self.get_json(endpoints::POSTS).await
    }

    pub async fn fetch_post(&self, post_id: i64) -> Result<Post, RequestError> {
        self.get_json(&endpoints::post(post_id)).await
    }

    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post, RequestError> {
        self.send_json(Method::POST, endpoints::POSTS, Some(draft))
            .await
    }

    pub async fn update_post(&self, post_id: i64, draft: &PostDraft) -> Result<Post, RequestError> {
        self.send_json(Method::PUT, &endpoints::post(post_id), Some(draft))
            .await
    }

    pub async fn delete_post(&self, post_id: i64) -> Result<(), RequestError> {
        self.delete(&endpoints::post(post_id)).await?;
        Ok(())
    }

    pub async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>, RequestError> {
        let path = endpoints::with_query(endpoints::POSTS_SEARCH, "keyword", keyword);
        self.get_json(&path).await
    }

    pub async fn fetch_posts_by_category(
        &self,
        category: FoodCategory,
    ) -> Result<Vec<Post>, RequestError> {
        self.get_json(&endpoints::posts_by_category(category.label()))
            .await
    }

    pub async fn fetch_posts_by_member(&self, member_id: i64) -> Result<Vec<Post>, RequestError> {
        self.get_json(&endpoints::posts_by_member(member_id)).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::auth::Session;
    use crate::models::{FoodCategory, PostDraft};
    use crate::services::test_support::{client_with, member_session};

    #[tokio::test]
    async fn test_search_and_category_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/search"))
            .and(query_param("keyword", "돼지 국밥"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "title": "Busan gukbap", "foodCategory": "한식" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts/category/%EC%B9%B4%ED%8E%98"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (client, _) = client_with(&server, Session::default());

        let found = client.search_posts("돼지 국밥").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category(), Some(FoodCategory::Korean));

        let cafes = client.fetch_posts_by_category(FoodCategory::Cafe).await.unwrap();
        assert!(cafes.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_sends_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(body_json(json!({
                "title": "Tonkatsu",
                "restaurantName": "Katsu House",
                "restaurantAddress": null,
                "foodCategory": "일식",
                "rating": 4.0,
                "imageUrl": null,
                "content": "Crispy"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 77, "title": "Tonkatsu", "memberId": 2
            })))
            .mount(&server)
            .await;

        let (client, _) = client_with(&server, member_session("2"));
        let draft = PostDraft {
            title: "Tonkatsu".to_string(),
            restaurant_name: "Katsu House".to_string(),
            restaurant_address: None,
            food_category: Some(FoodCategory::Japanese.label().to_string()),
            rating: Some(4.0),
            image_url: None,
            content: "Crispy".to_string(),
        };

        let post = client.create_post(&draft).await.unwrap();
        assert_eq!(post.id, 77);
        assert!(post.is_written_by("2"));
    }
}
