//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 除了路径，URL 查询参数也由这里持有：弹窗、标签页与正在创建的模板都是查询参数，
//! 浏览器前进/后退即可恢复界面状态。

use leptos::prelude::*;
use profile_soup_shared::nav::NavState;
use profile_soup_shared::params::{ParamKey, SearchParams};
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 获取当前查询字符串（含 `?`）
fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(url));
        }
    }
}

/// 读取当前地址；未知路径用 replaceState 重定向到落地页，保留查询参数
fn resolve_location() -> (AppRoute, SearchParams) {
    let path = current_path();
    let search = current_search();
    let (route, redirect) = AppRoute::resolve(&path);
    if redirect {
        log_info!("[Router] Unknown path {}. Redirecting to {}.", path, route);
        replace_history_state(&format!("{}{}", route.to_path(), search));
    }
    (route, SearchParams::parse(&search))
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 当前查询参数
    query: RwSignal<SearchParams>,
}

impl RouterService {
    fn new() -> Self {
        let (initial_route, initial_query) = resolve_location();
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            query: RwSignal::new(initial_query),
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 站内导航；查询参数随之清空
    pub fn navigate(&self, path: &str) {
        let (target, _) = AppRoute::resolve(path);
        push_history_state(target.to_path());
        self.query.set(SearchParams::default());
        self.set_route.set(target);
    }

    pub fn search_params(&self) -> SearchParamsHandle {
        SearchParamsHandle { router: *self }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let query = self.query;

        let closure = Closure::<dyn Fn()>::new(move || {
            let (route, params) = resolve_location();
            set_route.set(route);
            query.set(params);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 写入新的查询参数
    fn commit(&self, next: SearchParams, push: bool) {
        let url = format!(
            "{}{}",
            self.current_route.get_untracked().to_path(),
            next.to_search()
        );
        if push {
            push_history_state(&url);
        } else {
            replace_history_state(&url);
        }
        self.query.set(next);
    }
}

// ============================================================================
// 查询参数句柄
// ============================================================================

/// URL 查询参数的读写句柄
///
/// 每次修改都基于当前信号值同步计算出下一份参数，再写入 History。
#[derive(Clone, Copy)]
pub struct SearchParamsHandle {
    router: RouterService,
}

impl SearchParamsHandle {
    /// 响应式读取
    pub fn get(&self, key: ParamKey) -> Option<String> {
        self.router.query.with(|q| q.get(key).map(str::to_string))
    }

    pub fn get_untracked(&self, key: ParamKey) -> Option<String> {
        self.router
            .query
            .with_untracked(|q| q.get(key).map(str::to_string))
    }

    /// 响应式读取整份状态描述
    pub fn nav_state(&self) -> NavState {
        self.router.query.with(NavState::from_params)
    }

    /// `update_history` 为 false 时使用 replaceState：地址变化但不产生历史记录
    pub fn set(&self, key: ParamKey, value: &str, update_history: bool) {
        let mut next = self.router.query.get_untracked();
        next.set(key, value);
        self.router.commit(next, update_history);
    }

    /// 删除单个参数（总是 pushState）
    pub fn delete(&self, key: ParamKey) {
        self.delete_many(&[key]);
    }

    /// 一次 pushState 删除多个参数，用于结束整个流程
    pub fn delete_many(&self, keys: &[ParamKey]) {
        let mut next = self.router.query.get_untracked();
        for key in keys {
            next.delete(*key);
        }
        self.router.commit(next, true);
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router() -> RouterService {
    let router = RouterService::new();
    router.init_popstate_listener();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

pub fn use_search_params() -> SearchParamsHandle {
    use_router().search_params()
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(children: Children) -> impl IntoView {
    provide_router();

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时不刷新页面
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
