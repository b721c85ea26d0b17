//! Profile Soup 共享领域层
//!
//! 与平台无关的纯逻辑，前端 (WASM) 与原生测试共用：
//! - 领域模型（模板、已创建的 Profile、会话）
//! - 链接模板解析、表单校验、徽章 URL 构建
//! - URL 查询参数编解码与弹窗/标签页状态机
//! - 文档存储边界与 Profile 创建服务

use serde::{Deserialize, Serialize};

pub mod badge;
pub mod catalog;
pub mod error;
pub mod link;
pub mod nav;
pub mod notice;
pub mod params;
pub mod profile;
pub mod store;
pub mod validation;

pub use error::{SoupError, SoupErrorStatus, SoupResult};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 共享模板目录所在的集合
pub const COLLECTION_PROFILE_TYPES: &str = "profileTypes";
pub const COLLECTION_USERS: &str = "users";
pub const SUBCOLLECTION_DEFAULT_PROFILES: &str = "defaultProfiles";
pub const SUBCOLLECTION_CUSTOM_PROFILES: &str = "customProfiles";

/// 自定义 Profile 表单的默认颜色
pub const DEFAULT_CUSTOM_COLOR: &str = "#5DADE2";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 带文档 ID 的记录
///
/// 存储层返回的数据本身不含 ID，同步层会把文档 ID 附加进来。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Document<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// 默认 Profile 模板（只读目录，所有用户共享）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTemplate {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub icon: String,
    /// 链接模板，占位符形如 `__username__`
    #[serde(rename = "baseURL")]
    pub base_url: String,
}

/// 用户从模板实例化出的 Profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedDefaultProfile {
    /// 来源模板的文档 ID
    pub from: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub icon: String,
    pub link: String,
}

/// 完全由用户填写的 Profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomProfile {
    pub name: String,
    pub color: String,
    /// 图标的显示名称；未选择时序列化为 null
    pub icon: Option<String>,
    pub link: String,
}

/// 徽章渲染所需的最小投影
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeData {
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub link: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl From<&ProfileTemplate> for BadgeData {
    fn from(t: &ProfileTemplate) -> Self {
        Self {
            name: t.name.clone(),
            color: t.color.clone(),
            icon: non_empty(&t.icon),
            link: None,
        }
    }
}

impl From<&CreatedDefaultProfile> for BadgeData {
    fn from(p: &CreatedDefaultProfile) -> Self {
        Self {
            name: p.name.clone(),
            color: p.color.clone(),
            icon: non_empty(&p.icon),
            link: non_empty(&p.link),
        }
    }
}

impl From<&CustomProfile> for BadgeData {
    fn from(p: &CustomProfile) -> Self {
        Self {
            name: p.name.clone(),
            color: p.color.clone(),
            icon: p.icon.as_deref().and_then(non_empty),
            link: non_empty(&p.link),
        }
    }
}

// =========================================================
// 会话 (Session)
// =========================================================

/// 身份提供方给出的用户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// 认证三态：尚未加载 / 已加载且匿名 / 已加载且已登录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Loading,
    Anonymous,
    Authenticated(SessionUser),
}

impl AuthStatus {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, AuthStatus::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated(_))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            AuthStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// 登录成功后的附加信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInOutcome {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub is_new_user: bool,
}

/// 远端同步集合的视图
#[derive(Debug, Clone, PartialEq)]
pub enum Synced<T> {
    Loading,
    Ready(Vec<Document<T>>),
}

impl<T> Default for Synced<T> {
    fn default() -> Self {
        Synced::Loading
    }
}

impl<T> Synced<T> {
    pub fn ready(&self) -> Option<&[Document<T>]> {
        match self {
            Synced::Loading => None,
            Synced::Ready(docs) => Some(docs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_reads_base_url_field() {
        let doc: Document<ProfileTemplate> = serde_json::from_value(json!({
            "id": "gh",
            "name": "GitHub",
            "color": "#181717",
            "icon": "GitHub",
            "baseURL": "https://github.com/__username__"
        }))
        .unwrap();

        assert_eq!(doc.id, "gh");
        assert_eq!(doc.data.base_url, "https://github.com/__username__");
    }

    #[test]
    fn test_custom_profile_serializes_missing_icon_as_null() {
        let p = CustomProfile {
            name: "Blog".into(),
            color: "#5DADE2".into(),
            icon: None,
            link: "https://example.com".into(),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert!(v["icon"].is_null());
    }

    #[test]
    fn test_auth_status_tri_state() {
        assert!(!AuthStatus::Loading.is_loaded());
        assert!(AuthStatus::Anonymous.is_loaded());
        assert!(!AuthStatus::Anonymous.is_authenticated());

        let user = SessionUser {
            uid: "u1".into(),
            display_name: None,
            photo_url: None,
            email: None,
        };
        let status = AuthStatus::Authenticated(user);
        assert!(status.is_authenticated());
        assert_eq!(status.user().map(|u| u.uid.as_str()), Some("u1"));
    }

    #[test]
    fn test_badge_projection_drops_empty_icon() {
        let t = ProfileTemplate {
            name: "Site".into(),
            color: "#000000".into(),
            icon: String::new(),
            base_url: "https://site".into(),
        };
        let badge = BadgeData::from(&t);
        assert_eq!(badge.icon, None);
        assert_eq!(badge.link, None);
    }
}
