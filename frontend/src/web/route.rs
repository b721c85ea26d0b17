//! 路由定义模块 - 领域模型
//!
//! 纯粹的路由表，不依赖于 DOM 或 web_sys。
//! 应用只有一个落地页，其余路径统一重定向过去。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页
    #[default]
    Home,
}

impl AppRoute {
    /// 解析 URL path，未知路径返回 None
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/home" => Some(Self::Home),
            _ => None,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/home",
        }
    }

    /// 未匹配路径的重定向目标
    pub fn fallback() -> Self {
        Self::Home
    }

    /// 解析路径；需要重定向时第二项为 true
    pub fn resolve(path: &str) -> (Self, bool) {
        match Self::from_path(path) {
            Some(route) => (route, false),
            None => (Self::fallback(), true),
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
