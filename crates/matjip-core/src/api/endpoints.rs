//! Backend paths, relative to the API base URL.

pub const MEMBERS: &str = "/members";
pub const MEMBER_LOGIN: &str = "/members/login";
pub const MEMBER_REFRESH: &str = "/members/refresh";
pub const CHECK_EMAIL: &str = "/members/check-email";
pub const CHECK_NICKNAME: &str = "/members/check-nickname";

pub const POSTS: &str = "/posts";
pub const POSTS_SEARCH: &str = "/posts/search";

pub fn member(id: i64) -> String {
    format!("/members/{}", id)
}

pub fn post(id: i64) -> String {
    format!("/posts/{}", id)
}

pub fn posts_by_member(member_id: i64) -> String {
    format!("/posts/member/{}", member_id)
}

pub fn posts_by_category(category: &str) -> String {
    format!("/posts/category/{}", urlencoding::encode(category))
}

pub fn comments(post_id: i64) -> String {
    format!("/posts/{}/comments", post_id)
}

pub fn comment(post_id: i64, comment_id: i64) -> String {
    format!("/posts/{}/comments/{}", post_id, comment_id)
}

pub fn comments_by_member(member_id: i64) -> String {
    format!("/members/{}/comments", member_id)
}

pub fn post_likes(post_id: i64) -> String {
    format!("/posts/{}/likes", post_id)
}

pub fn post_like_toggle(post_id: i64) -> String {
    format!("/posts/{}/likes/toggle", post_id)
}

pub fn post_like_count(post_id: i64) -> String {
    format!("/posts/{}/likes/count", post_id)
}

pub fn post_likes_by_member(member_id: i64) -> String {
    format!("/posts/likes/member/{}", member_id)
}

pub fn comment_likes(comment_id: i64) -> String {
    format!("/comments/{}/likes", comment_id)
}

pub fn comment_like_toggle(comment_id: i64) -> String {
    format!("/comments/{}/likes/toggle", comment_id)
}

pub fn comment_like_count(comment_id: i64) -> String {
    format!("/comments/{}/likes/count", comment_id)
}

pub fn comment_likes_by_member(member_id: i64) -> String {
    format!("/comments/likes/member/{}", member_id)
}

/// Append a single URL-encoded query parameter.
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    format!("{}?{}={}", path, key, urlencoding::encode(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_values_are_encoded() {
        assert_eq!(
            with_query(POSTS_SEARCH, "keyword", "김치 찌개&more"),
            "/posts/search?keyword=%EA%B9%80%EC%B9%98%20%EC%B0%8C%EA%B0%9C%26more"
        );
        assert_eq!(
            with_query(CHECK_EMAIL, "email", "a+b@example.com"),
            "/members/check-email?email=a%2Bb%40example.com"
        );
    }

    #[test]
    fn test_category_path_is_encoded() {
        assert_eq!(posts_by_category("한식"), "/posts/category/%ED%95%9C%EC%8B%9D");
        assert_eq!(posts_by_category("cafe"), "/posts/category/cafe");
    }
}
