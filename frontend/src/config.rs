//! 应用配置
//!
//! 编译期通过 `option_env!` 注入，未设置时使用默认值。

use profile_soup_shared::badge::{BadgeStyle, DEFAULT_BADGE_ENDPOINT, DEFAULT_BADGE_STYLE};
use serde::Serialize;

pub const DEFAULT_AUTH_DOMAIN: &str = "profile-soup.firebaseapp.com";
pub const DEFAULT_PROJECT_ID: &str = "profile-soup";
pub const DEFAULT_ICON_CATALOG_URL: &str =
    "https://cdn.jsdelivr.net/npm/simple-icons@v13/_data/simple-icons.json";
pub const DEFAULT_ICON_CDN: &str = "https://cdn.jsdelivr.net/npm/simple-icons@v13/icons";

/// 传给 `firebase.initializeApp` 的配置对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub app_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub firebase: FirebaseConfig,
    pub badge: BadgeStyle,
    pub icon_catalog_url: String,
    pub icon_cdn: String,
}

fn env_or(value: Option<&'static str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            firebase: FirebaseConfig {
                api_key: env_or(option_env!("PROFILE_SOUP_FIREBASE_API_KEY"), ""),
                auth_domain: env_or(
                    option_env!("PROFILE_SOUP_FIREBASE_AUTH_DOMAIN"),
                    DEFAULT_AUTH_DOMAIN,
                ),
                project_id: env_or(
                    option_env!("PROFILE_SOUP_FIREBASE_PROJECT_ID"),
                    DEFAULT_PROJECT_ID,
                ),
                app_id: env_or(option_env!("PROFILE_SOUP_FIREBASE_APP_ID"), ""),
            },
            badge: BadgeStyle {
                endpoint: env_or(
                    option_env!("PROFILE_SOUP_BADGE_ENDPOINT"),
                    DEFAULT_BADGE_ENDPOINT,
                ),
                style: env_or(option_env!("PROFILE_SOUP_BADGE_STYLE"), DEFAULT_BADGE_STYLE),
            },
            icon_catalog_url: env_or(
                option_env!("PROFILE_SOUP_ICON_CATALOG_URL"),
                DEFAULT_ICON_CATALOG_URL,
            ),
            icon_cdn: env_or(option_env!("PROFILE_SOUP_ICON_CDN"), DEFAULT_ICON_CDN),
        }
    }

    pub fn warn_if_incomplete(&self) {
        if self.firebase.api_key.is_empty() {
            log_warn!("[Config] PROFILE_SOUP_FIREBASE_API_KEY is not set; sign-in and sync will fail");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_blank() {
        assert_eq!(env_or(None, "x"), "x");
        assert_eq!(env_or(Some("  "), "x"), "x");
        assert_eq!(env_or(Some("y"), "x"), "y");
    }

    #[test]
    fn test_firebase_config_uses_js_field_names() {
        let cfg = FirebaseConfig {
            api_key: "k".into(),
            auth_domain: "d".into(),
            project_id: "p".into(),
            app_id: "a".into(),
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["apiKey"], "k");
        assert_eq!(json["authDomain"], "d");
        assert_eq!(json["projectId"], "p");
        assert_eq!(json["appId"], "a");
    }
}
