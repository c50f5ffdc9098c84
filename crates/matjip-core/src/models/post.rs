use serde::{Deserialize, Serialize};

/// Food categories used by the site. The backend stores the Korean label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodCategory {
    Korean,
    Chinese,
    Japanese,
    Western,
    Cafe,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 5] = [
        FoodCategory::Korean,
        FoodCategory::Chinese,
        FoodCategory::Japanese,
        FoodCategory::Western,
        FoodCategory::Cafe,
    ];

    /// Label as stored by the backend
    pub fn label(&self) -> &'static str {
        match self {
            FoodCategory::Korean => "한식",
            FoodCategory::Chinese => "중식",
            FoodCategory::Japanese => "일식",
            FoodCategory::Western => "양식",
            FoodCategory::Cafe => "카페",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            FoodCategory::Korean => "🌶️",
            FoodCategory::Chinese => "🥟",
            FoodCategory::Japanese => "🍱",
            FoodCategory::Western => "🍝",
            FoodCategory::Cafe => "☕",
        }
    }

    /// Accepts the backend label or the English name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|c| {
            c.label() == s || c.to_string().eq_ignore_ascii_case(s)
        })
    }
}

impl std::fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FoodCategory::Korean => write!(f, "korean"),
            FoodCategory::Chinese => write!(f, "chinese"),
            FoodCategory::Japanese => write!(f, "japanese"),
            FoodCategory::Western => write!(f, "western"),
            FoodCategory::Cafe => write!(f, "cafe"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostImage {
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "restaurantName", default)]
    pub restaurant_name: Option<String>,
    #[serde(rename = "restaurantAddress", default)]
    pub restaurant_address: Option<String>,
    #[serde(rename = "foodCategory", default)]
    pub food_category: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<PostImage>,
    #[serde(rename = "memberId", default)]
    pub member_id: Option<i64>,
    #[serde(rename = "memberNickname", default)]
    pub member_nickname: Option<String>,
    #[serde(rename = "viewCount", default)]
    pub view_count: i64,
    #[serde(rename = "likeCount", default)]
    pub like_count: i64,
    #[serde(rename = "commentCount", default)]
    pub comment_count: i64,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl Post {
    pub fn category(&self) -> Option<FoodCategory> {
        self.food_category.as_deref().and_then(FoodCategory::parse)
    }

    /// Whether `member_id` (as stored in the session) wrote this post.
    pub fn is_written_by(&self, member_id: &str) -> bool {
        self.member_id
            .map(|id| id.to_string() == member_id)
            .unwrap_or(false)
    }
}

/// Body for creating or updating a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostDraft {
    pub title: String,
    #[serde(rename = "restaurantName")]
    pub restaurant_name: String,
    #[serde(rename = "restaurantAddress")]
    pub restaurant_address: Option<String>,
    #[serde(rename = "foodCategory")]
    pub food_category: Option<String>,
    pub rating: Option<f64>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub content: String,
}
