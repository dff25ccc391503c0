use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_PROFILE_PICTURE: &str = "/images/default_pfp.jpg";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// "First Last", tolerating either part being absent
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    pub fn profile_picture_or_default(&self) -> &str {
        self.profile_picture
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROFILE_PICTURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>, picture: Option<&str>) -> User {
        User {
            id: Uuid::nil(),
            email: "someone@example.com".into(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            profile_picture: picture.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_name_handles_missing_parts() {
        assert_eq!(user(Some("Ada"), Some("Lovelace"), None).full_name(), "Ada Lovelace");
        assert_eq!(user(Some("Ada"), None, None).full_name(), "Ada");
        assert_eq!(user(None, None, None).full_name(), "");
    }

    #[test]
    fn falls_back_to_default_picture() {
        assert_eq!(user(None, None, None).profile_picture_or_default(), DEFAULT_PROFILE_PICTURE);
        assert_eq!(user(None, None, Some("")).profile_picture_or_default(), DEFAULT_PROFILE_PICTURE);
        assert_eq!(user(None, None, Some("/p.png")).profile_picture_or_default(), "/p.png");
    }
}
