//! 认证模块
//!
//! 用户状态完全来自托管认证服务的监听回调，本模块只负责把它变成信号。
//! 弹窗与导航栏通过 `AuthStatus` 三态决定显示内容。

use leptos::prelude::*;
use profile_soup_shared::{AuthStatus, SignInOutcome, SoupResult};

use crate::firebase;

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthStatus>,
    set_state: WriteSignal<AuthStatus>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthStatus::Loading);
        Self { state, set_state }
    }

    /// 当前用户 uid（响应式）
    pub fn uid(&self) -> Option<String> {
        self.state.with(|s| s.user().map(|u| u.uid.clone()))
    }

    pub fn uid_untracked(&self) -> Option<String> {
        self.state.with_untracked(|s| s.user().map(|u| u.uid.clone()))
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 订阅认证状态变化
///
/// 注册失败（SDK 未加载等）时直接视为匿名，避免界面一直停留在加载态。
pub fn init_auth(ctx: &AuthContext) {
    let set_state = ctx.set_state;
    let registered = firebase::on_auth_state_changed(move |user| {
        let next = match user {
            Some(user) => {
                log_info!("[Auth] Signed in as {}", user.uid);
                AuthStatus::Authenticated(user)
            }
            None => {
                log_info!("[Auth] Signed out");
                AuthStatus::Anonymous
            }
        };
        set_state.set(next);
    });

    if let Err(e) = registered {
        log_error!("[Auth] Listener registration failed: {}", e);
        set_state.set(AuthStatus::Anonymous);
    }
}

/// Google 弹窗登录
///
/// 成功后无需手动更新状态，监听回调会推送新用户。
pub async fn sign_in() -> SoupResult<SignInOutcome> {
    let outcome = firebase::sign_in_with_google().await?;
    if outcome.is_new_user {
        log_info!("[Auth] First sign-in for {:?}", outcome.user_name);
    }
    Ok(outcome)
}

/// 注销，导航栏与弹窗随监听回调自动更新
pub async fn sign_out() -> SoupResult<()> {
    firebase::sign_out().await
}
