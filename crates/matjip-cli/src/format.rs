use chrono::{Local, NaiveDateTime};

use matjip_core::models::Post;

/// Backend timestamps come as `2024-01-25 14:30:00` or ISO `2024-01-25T14:30:00`.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Relative age like "3h ago", measured against `now`.
pub fn relative_time(raw: &str, now: NaiveDateTime) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return String::new();
    };

    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        // Also covers clock skew
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    let days = hours / 24;
    if days < 7 {
        format!("{}d ago", days)
    } else if days < 30 {
        format!("{}w ago", days / 7)
    } else if days < 365 {
        format!("{}mo ago", days / 30)
    } else {
        format!("{}y ago", days / 365)
    }
}

pub fn relative_to_now(raw: &str) -> String {
    relative_time(raw, Local::now().naive_local())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// One-line summary used by the post list
pub fn post_line(post: &Post) -> String {
    let category = post
        .category()
        .map(|c| format!("{} ", c.emoji()))
        .unwrap_or_default();
    let rating = post
        .rating
        .map(|r| format!(" ⭐{:.1}", r))
        .unwrap_or_default();
    let age = post
        .created_at
        .as_deref()
        .map(relative_to_now)
        .unwrap_or_default();

    format!(
        "#{:<5} {}{}{}  by {}  {}",
        post.id,
        category,
        truncate_string(&post.title, 40),
        rating,
        post.member_nickname.as_deref().unwrap_or("anonymous"),
        age
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_relative_time() {
        let now = at("2024-03-01 12:00:00");
        assert_eq!(relative_time("2024-03-01 11:59:30", now), "just now");
        assert_eq!(relative_time("2024-03-01 11:15:00", now), "45m ago");
        assert_eq!(relative_time("2024-03-01T09:00:00", now), "3h ago");
        assert_eq!(relative_time("2024-02-27 12:00:00", now), "3d ago");
        assert_eq!(relative_time("2024-02-16 12:00:00", now), "2w ago");
        assert_eq!(relative_time("2023-12-01 12:00:00", now), "3mo ago");
        assert_eq!(relative_time("2022-01-01 12:00:00", now), "2y ago");
        // Future timestamps (clock skew)
        assert_eq!(relative_time("2024-03-02 12:00:00", now), "just now");
        assert_eq!(relative_time("yesterday", now), "");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("냉면 맛집 추천", 5), "냉면...");
    }
}
