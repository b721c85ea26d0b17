//! Profile Soup 前端应用
//!
//! Context-Driven 架构：
//! - `web::route` / `web::router`: 路由与 URL 查询参数（弹窗状态全部存放在 URL 中）
//! - `firebase`: 托管认证与文档数据库的 JS 桥接
//! - `auth` / `sync` / `notify`: 全局上下文
//! - `components`: UI 组件层

// 日志宏需在所有子模块之前定义
#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}
#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}
#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

mod auth;
mod components {
    pub mod add_profile;
    pub mod badge;
    pub mod home;
    pub mod icons;
    pub mod login;
    pub mod navbar;
    pub mod popup;
}
mod config;
mod firebase;
mod notify;
mod serde_helper;
mod sync;

use std::sync::Arc;

use leptos::prelude::*;
use profile_soup_shared::profile::ProfileService;

use crate::auth::{AuthContext, init_auth};
use crate::components::home::HomePage;
use crate::components::navbar::NavBar;
use crate::components::popup::Popup;
use crate::config::AppConfig;
use crate::firebase::FirestoreStore;
use crate::notify::{NoticeContext, Toaster};
use crate::sync::{IconCatalog, provide_sync};

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::HttpClient;
    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// daisyUI 主题名（琥珀主色 / 浅蓝辅色，定义见 index.html）
pub const THEME_NAME: &str = "profilesoup";

/// 全局共享的 Profile 创建服务（含防重复提交标记）
pub type ProfileServiceHandle = Arc<ProfileService<FirestoreStore>>;

pub fn use_profile_service() -> ProfileServiceHandle {
    use_context::<ProfileServiceHandle>().expect("ProfileService should be provided")
}

pub fn use_config() -> AppConfig {
    use_context::<AppConfig>().expect("AppConfig should be provided")
}

/// 路由匹配函数
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
    }
}

#[component]
fn Theme(children: Children) -> impl IntoView {
    view! {
        <div data-theme=THEME_NAME class="min-h-screen bg-base-200 font-sans">
            {children()}
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 配置
    let config = AppConfig::from_env();
    config.warn_if_incomplete();
    if let Err(e) = firebase::init(&config.firebase) {
        log_error!("[App] Firebase init failed: {}", e);
    }
    provide_context(config);

    // 2. 通知
    provide_context(NoticeContext::new());

    // 3. 认证：监听托管认证服务的用户状态
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    // 4. 数据同步：模板目录 + 随 uid 切换的用户集合
    provide_sync(auth_ctx);
    provide_context(IconCatalog::new());

    let service: ProfileServiceHandle = Arc::new(ProfileService::new(FirestoreStore));
    provide_context(service);

    view! {
        <Theme>
            <Router>
                <NavBar />
                <Popup />
                <main class="max-w-5xl mx-auto p-4 md:p-8">
                    <RouterOutlet matcher=route_matcher />
                </main>
                <Toaster />
            </Router>
        </Theme>
    }
}
