//! 文档存储边界
//!
//! 应用只依赖两种能力：
//! - 订阅某个集合（可限定在用户路径下），持续收到有序快照
//! - 向集合追加一篇新文档
//!
//! 具体后端由前端实现（Firebase JS 桥接），测试中使用内存实现。

use std::fmt::{self, Display};

use async_trait::async_trait;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{SoupError, SoupResult};
use crate::{
    COLLECTION_PROFILE_TYPES, COLLECTION_USERS, Document, SUBCOLLECTION_CUSTOM_PROFILES,
    SUBCOLLECTION_DEFAULT_PROFILES,
};

/// 集合路径，如 `profileTypes` 或 `users/<uid>/defaultProfiles`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn profile_types() -> Self {
        Self(COLLECTION_PROFILE_TYPES.to_string())
    }

    pub fn user_default_profiles(uid: &str) -> Self {
        Self(format!(
            "{}/{}/{}",
            COLLECTION_USERS, uid, SUBCOLLECTION_DEFAULT_PROFILES
        ))
    }

    pub fn user_custom_profiles(uid: &str) -> Self {
        Self(format!(
            "{}/{}/{}",
            COLLECTION_USERS, uid, SUBCOLLECTION_CUSTOM_PROFILES
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 同步层给出的原始文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub data: serde_json::Value,
}

/// 集合的一次完整快照，保持后端给出的顺序
pub type Snapshot = Vec<RawDocument>;

impl<T: DeserializeOwned> Document<T> {
    pub fn decode(raw: &RawDocument) -> SoupResult<Self> {
        let data = serde_json::from_value(raw.data.clone())
            .map_err(|e| SoupError::from(e).in_op_with("document.decode", raw.id.clone()))?;
        Ok(Document::new(raw.id.clone(), data))
    }
}

/// 解码整份快照；无法解码的文档单独返回，交给调用方记录日志
pub fn decode_snapshot<T: DeserializeOwned>(
    snapshot: &Snapshot,
) -> (Vec<Document<T>>, Vec<SoupError>) {
    let mut docs = Vec::with_capacity(snapshot.len());
    let mut errors = Vec::new();
    for raw in snapshot {
        match Document::decode(raw) {
            Ok(doc) => docs.push(doc),
            Err(e) => errors.push(e),
        }
    }
    (docs, errors)
}

// =========================================================
// 抽象接口
// =========================================================

/// 写入能力
#[async_trait(?Send)]
pub trait DocumentStore {
    /// 追加文档，返回新文档 ID
    async fn append(&self, path: &CollectionPath, document: serde_json::Value)
    -> SoupResult<String>;
}

/// 订阅能力：推送式的快照流，drop 即取消订阅
pub trait CollectionFeed {
    type Stream: Stream<Item = SoupResult<Snapshot>> + Unpin + 'static;

    fn subscribe(&self, path: &CollectionPath) -> Self::Stream;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfileTemplate;
    use serde_json::json;

    #[test]
    fn test_user_scoped_paths() {
        assert_eq!(
            CollectionPath::user_default_profiles("abc").as_str(),
            "users/abc/defaultProfiles"
        );
        assert_eq!(
            CollectionPath::user_custom_profiles("abc").to_string(),
            "users/abc/customProfiles"
        );
        assert_eq!(CollectionPath::profile_types().as_str(), "profileTypes");
    }

    #[test]
    fn test_decode_snapshot_skips_malformed() {
        let snapshot = vec![
            RawDocument {
                id: "gh".into(),
                data: json!({"name": "GitHub", "color": "#181717", "icon": "GitHub", "baseURL": "https://github.com/__username__"}),
            },
            RawDocument {
                id: "broken".into(),
                data: json!({"name": 3}),
            },
        ];

        let (docs, errors) = decode_snapshot::<ProfileTemplate>(&snapshot);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "gh");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("document.decode(broken)"));
    }
}
