//! 弹窗 / 标签页状态机
//!
//! 状态 = 三个查询参数组成的元组。这里只有纯函数：
//! 给定参数与认证状态，计算应显示什么、以及 URL 是否需要被纠正。

use crate::AuthStatus;
use crate::params::{ParamKey, SearchParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    Login,
    AddProfile,
}

impl PopupKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "login" => Some(Self::Login),
            "addProfile" => Some(Self::AddProfile),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::AddProfile => "addProfile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    Default,
    Custom,
}

impl ProfileTab {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "default" => Some(Self::Default),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Custom => "custom",
        }
    }
}

/// 由 URL 重建出的导航状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub popup: Option<PopupKind>,
    pub profile_tab: Option<ProfileTab>,
    pub create_profile: Option<String>,
}

impl NavState {
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            popup: params.get(ParamKey::Popup).and_then(PopupKind::parse),
            profile_tab: params.get(ParamKey::ProfileTab).and_then(ProfileTab::parse),
            create_profile: params.get(ParamKey::CreateProfile).map(str::to_string),
        }
    }
}

// =========================================================
// 弹窗分发
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupDecision {
    /// 没有弹窗
    Hidden,
    Show(PopupKind),
    /// 前置条件不再成立，需要删除 `popup` 参数
    Close,
}

/// 认证仍在加载时保持请求的弹窗，避免误关
pub fn reconcile_popup(popup: Option<&str>, auth: &AuthStatus) -> PopupDecision {
    let Some(kind) = popup.and_then(PopupKind::parse) else {
        return PopupDecision::Hidden;
    };

    let precondition_failed = match kind {
        PopupKind::Login => auth.is_loaded() && auth.is_authenticated(),
        PopupKind::AddProfile => auth.is_loaded() && !auth.is_authenticated(),
    };

    if precondition_failed {
        PopupDecision::Close
    } else {
        PopupDecision::Show(kind)
    }
}

// =========================================================
// 标签页选择
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabResolution {
    /// 实际应渲染的标签页
    pub tab: ProfileTab,
    /// 需要写回 URL 的值；None 表示 URL 已经正确
    pub correction: Option<ProfileTab>,
}

pub fn resolve_profile_tab(param: Option<&str>, templates_available: bool) -> TabResolution {
    let fallback = if templates_available {
        ProfileTab::Default
    } else {
        ProfileTab::Custom
    };

    match param.and_then(ProfileTab::parse) {
        None => TabResolution {
            tab: fallback,
            correction: Some(fallback),
        },
        Some(ProfileTab::Default) if !templates_available => TabResolution {
            tab: ProfileTab::Custom,
            correction: Some(ProfileTab::Custom),
        },
        Some(tab) => TabResolution {
            tab,
            correction: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionUser;

    fn signed_in() -> AuthStatus {
        AuthStatus::Authenticated(SessionUser {
            uid: "u1".into(),
            display_name: Some("Ada".into()),
            photo_url: None,
            email: None,
        })
    }

    #[test]
    fn test_login_closes_once_authenticated() {
        assert_eq!(
            reconcile_popup(Some("login"), &AuthStatus::Anonymous),
            PopupDecision::Show(PopupKind::Login)
        );
        assert_eq!(
            reconcile_popup(Some("login"), &signed_in()),
            PopupDecision::Close
        );
    }

    #[test]
    fn test_add_profile_requires_user() {
        assert_eq!(
            reconcile_popup(Some("addProfile"), &AuthStatus::Anonymous),
            PopupDecision::Close
        );
        assert_eq!(
            reconcile_popup(Some("addProfile"), &signed_in()),
            PopupDecision::Show(PopupKind::AddProfile)
        );
    }

    #[test]
    fn test_loading_auth_keeps_popup() {
        assert_eq!(
            reconcile_popup(Some("addProfile"), &AuthStatus::Loading),
            PopupDecision::Show(PopupKind::AddProfile)
        );
        assert_eq!(
            reconcile_popup(Some("login"), &AuthStatus::Loading),
            PopupDecision::Show(PopupKind::Login)
        );
    }

    #[test]
    fn test_unknown_popup_is_hidden() {
        assert_eq!(reconcile_popup(None, &signed_in()), PopupDecision::Hidden);
        assert_eq!(
            reconcile_popup(Some("settings"), &signed_in()),
            PopupDecision::Hidden
        );
    }

    #[test]
    fn test_tab_resolution_always_valid() {
        for param in [None, Some("default"), Some("custom"), Some("bogus"), Some("")] {
            for available in [true, false] {
                let res = resolve_profile_tab(param, available);
                if !available {
                    assert_eq!(res.tab, ProfileTab::Custom);
                }
                // 纠正后的值在同一策略下必须稳定
                let again = resolve_profile_tab(Some(res.tab.as_str()), available);
                assert_eq!(again.tab, res.tab);
                assert_eq!(again.correction, None);
            }
        }
    }

    #[test]
    fn test_tab_defaults() {
        assert_eq!(
            resolve_profile_tab(None, true),
            TabResolution {
                tab: ProfileTab::Default,
                correction: Some(ProfileTab::Default)
            }
        );
        assert_eq!(
            resolve_profile_tab(Some("default"), false).correction,
            Some(ProfileTab::Custom)
        );
        assert_eq!(resolve_profile_tab(Some("custom"), true).correction, None);
    }

    #[test]
    fn test_nav_state_from_params() {
        let params = SearchParams::parse("?popup=addProfile&profileTab=nope&createProfile=GitHub");
        let state = NavState::from_params(&params);
        assert_eq!(state.popup, Some(PopupKind::AddProfile));
        assert_eq!(state.profile_tab, None);
        assert_eq!(state.create_profile.as_deref(), Some("GitHub"));
    }
}
