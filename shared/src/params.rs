//! URL 查询参数
//!
//! 查询串是 "当前显示哪个浮层" 的唯一事实来源。
//! 这里只负责编解码，浏览器 History 的读写在前端 `web::router` 中完成。

use url::form_urlencoded;

/// 应用识别的查询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Popup,
    ProfileTab,
    CreateProfile,
}

impl ParamKey {
    pub const ALL: [ParamKey; 3] = [ParamKey::Popup, ParamKey::ProfileTab, ParamKey::CreateProfile];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::Popup => "popup",
            ParamKey::ProfileTab => "profileTab",
            ParamKey::CreateProfile => "createProfile",
        }
    }
}

/// 有序的键值对集合，语义与 `URLSearchParams` 一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// 解析 `location.search`，允许带或不带前导 `?`
    pub fn parse(search: &str) -> Self {
        let query = search.strip_prefix('?').unwrap_or(search);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    pub fn get(&self, key: ParamKey) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key.as_str())
            .map(|(_, v)| v.as_str())
    }

    /// 覆盖第一次出现的位置，并移除其余重复项
    pub fn set(&mut self, key: ParamKey, value: &str) {
        let name = key.as_str();
        let mut replaced = false;
        self.pairs.retain_mut(|(k, v)| {
            if k != name {
                return true;
            }
            if replaced {
                return false;
            }
            *v = value.to_string();
            replaced = true;
            true
        });
        if !replaced {
            self.pairs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn delete(&mut self, key: ParamKey) {
        self.pairs.retain(|(k, _)| k != key.as_str());
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 序列化为 `location.search` 形式：空集合为 ""，否则以 `?` 开头
    pub fn to_search(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        format!("?{}", serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_get() {
        let params = SearchParams::parse("?popup=addProfile&profileTab=default&createProfile=Stack+Overflow");
        assert_eq!(params.get(ParamKey::Popup), Some("addProfile"));
        assert_eq!(params.get(ParamKey::ProfileTab), Some("default"));
        assert_eq!(params.get(ParamKey::CreateProfile), Some("Stack Overflow"));
    }

    #[test]
    fn test_set_replaces_and_dedups() {
        let mut params = SearchParams::parse("popup=login&utm=x&popup=other");
        params.set(ParamKey::Popup, "addProfile");
        assert_eq!(params.to_search(), "?popup=addProfile&utm=x");
    }

    #[test]
    fn test_set_appends_new_key() {
        let mut params = SearchParams::parse("");
        params.set(ParamKey::ProfileTab, "custom");
        assert_eq!(params.to_search(), "?profileTab=custom");
    }

    #[test]
    fn test_delete_keeps_unrelated_keys() {
        let mut params = SearchParams::parse("?popup=login&ref=home");
        params.delete(ParamKey::Popup);
        assert_eq!(params.get(ParamKey::Popup), None);
        assert_eq!(params.to_search(), "?ref=home");

        params = SearchParams::parse("?popup=login");
        params.delete(ParamKey::Popup);
        assert!(params.is_empty());
        assert_eq!(params.to_search(), "");
    }

    #[test]
    fn test_values_are_escaped() {
        let mut params = SearchParams::default();
        params.set(ParamKey::CreateProfile, "A&B=C");
        let search = params.to_search();
        assert_eq!(search, "?createProfile=A%26B%3DC");
        assert_eq!(
            SearchParams::parse(&search).get(ParamKey::CreateProfile),
            Some("A&B=C")
        );
    }

    #[test]
    fn test_search_starts_with_first_pair() {
        let mut params = SearchParams::default();
        params.set(ParamKey::Popup, "login");
        assert_eq!(params.to_search(), "?popup=login");

        params.set(ParamKey::ProfileTab, "default");
        let search = params.to_search();
        assert!(!search.starts_with("?&"));
        assert_eq!(search, "?popup=login&profileTab=default");
        assert_eq!(SearchParams::parse(&search), params);
    }
}
