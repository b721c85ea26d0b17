//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 替代 `gloo-storage`，提供简洁的本地存储接口。
//! 结构化数据以 JSON 存储（`serde-json-wasm`）。

use serde::{Serialize, de::DeserializeOwned};

/// 本地存储操作封装
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 键不存在或发生错误时返回 None
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }

    /// 读取 JSON 值；内容损坏时删除该键
    pub fn get_json<T: DeserializeOwned>(key: &str) -> Option<T> {
        let raw = Self::get(key)?;
        match serde_json_wasm::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log_warn!("[Storage] Dropping unreadable entry {}: {}", key, e);
                Self::delete(key);
                None
            }
        }
    }

    pub fn set_json<T: Serialize>(key: &str, value: &T) -> bool {
        match serde_json_wasm::to_string(value) {
            Ok(raw) => Self::set(key, &raw),
            Err(e) => {
                log_warn!("[Storage] Failed to encode {}: {}", key, e);
                false
            }
        }
    }
}
