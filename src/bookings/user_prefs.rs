use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

pub const USER_PREFS_COOKIE: &str = "user-prefs";

/// Preferences remembered across visits in the `user-prefs` cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrefs {
    pub per_page: u32,
}

impl UserPrefs {
    pub fn defaults(pagination: &PaginationConfig) -> Self {
        Self { per_page: pagination.default_per_page }
    }

    /// Decode the cookie value; anything unreadable counts as absent
    pub fn decode(value: &str) -> Option<Self> {
        let json = urlencoding::decode(value).ok()?;
        serde_json::from_str(&json).ok()
    }

    pub fn encode(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        urlencoding::encode(&json).into_owned()
    }

    pub fn to_cookie(&self) -> Cookie<'static> {
        Cookie::build((USER_PREFS_COOKIE, self.encode()))
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(365))
            .build()
    }
}

/// Read the prefs cookie and apply a `per_page` parameter when the request has one
pub fn update_with_per_page(
    jar: &CookieJar,
    per_page_param: Option<u32>,
    pagination: &PaginationConfig,
) -> UserPrefs {
    let mut prefs = jar
        .get(USER_PREFS_COOKIE)
        .and_then(|c| UserPrefs::decode(c.value()))
        .unwrap_or_else(|| UserPrefs::defaults(pagination));

    if let Some(per_page) = per_page_param {
        prefs.per_page = per_page;
    }
    prefs.per_page = prefs.per_page.clamp(1, pagination.max_per_page.max(1));
    prefs
}
