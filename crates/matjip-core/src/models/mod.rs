//! Request and response bodies for the matjip backend.
//!
//! - `Member`, `LoginResponse`: accounts and authentication
//! - `Post`, `PostDraft`, `FoodCategory`: restaurant reviews
//! - `Comment`, `CommentDraft`: review comments
//! - `LikeStatus`, `LikedItem`: likes on posts and comments

pub mod comment;
pub mod like;
pub mod member;
pub mod post;

pub use comment::{Comment, CommentDraft};
pub use like::{LikeStatus, LikedItem};
pub use member::{LoginRequest, LoginResponse, Member, MemberUpdate, SignupRequest};
pub use post::{FoodCategory, Post, PostDraft, PostImage};
