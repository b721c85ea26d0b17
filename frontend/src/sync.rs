//! 数据同步
//!
//! - 模板目录 `profileTypes`：应用启动即订阅，快照写入 LocalStorage 供下次热启动
//! - 当前用户的 `defaultProfiles` / `customProfiles`：随 uid 变化重新订阅
//! - 图标目录：首次打开选择器时按需拉取

use futures::StreamExt;
use futures::future::{AbortHandle, Abortable};
use leptos::prelude::*;
use leptos::task::spawn_local;
use profile_soup_shared::catalog::{IconOption, available_templates, parse_icon_catalog};
use profile_soup_shared::store::{CollectionFeed, CollectionPath, decode_snapshot};
use profile_soup_shared::{
    CreatedDefaultProfile, CustomProfile, Document, ProfileTemplate, SoupResult, Synced,
};
use serde::de::DeserializeOwned;

use crate::auth::AuthContext;
use crate::config::AppConfig;
use crate::firebase::FirestoreStore;
use crate::web::{HttpClient, LocalStorage};

const PROFILE_TYPES_CACHE_KEY: &str = "profile_soup_profile_types";

/// 已同步集合的只读视图
#[derive(Clone, Copy)]
pub struct SyncContext {
    pub profile_types: RwSignal<Synced<ProfileTemplate>>,
    pub existing_default_profiles: RwSignal<Synced<CreatedDefaultProfile>>,
    pub custom_profiles: RwSignal<Synced<CustomProfile>>,
}

impl SyncContext {
    /// 用户还能添加的模板；目录或已有 Profile 任一未加载时为 None
    pub fn available_templates(&self) -> Memo<Option<Vec<Document<ProfileTemplate>>>> {
        let profile_types = self.profile_types;
        let existing = self.existing_default_profiles;
        Memo::new(move |_| {
            profile_types.with(|types| {
                existing.with(|existing| match (types.ready(), existing.ready()) {
                    (Some(types), Some(existing)) => Some(available_templates(types, existing)),
                    _ => None,
                })
            })
        })
    }
}

pub fn use_sync() -> SyncContext {
    use_context::<SyncContext>().expect("SyncContext should be provided")
}

/// 订阅一个集合，把解码后的快照写入目标信号，返回用于取消的句柄
fn spawn_feed<T>(path: CollectionPath, target: RwSignal<Synced<T>>) -> AbortHandle
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let (handle, registration) = AbortHandle::new_pair();
    let mut feed = FirestoreStore.subscribe(&path);
    log_info!("[Sync] Subscribed to {}", path);

    let task = async move {
        while let Some(item) = feed.next().await {
            match item {
                Ok(snapshot) => {
                    let (docs, errors) = decode_snapshot::<T>(&snapshot);
                    for err in errors {
                        log_warn!("[Sync] Skipping document: {}", err);
                    }
                    target.set(Synced::Ready(docs));
                }
                Err(e) => log_error!("[Sync] Feed error: {}", e),
            }
        }
    };

    spawn_local(async move {
        if Abortable::new(task, registration).await.is_err() {
            log_info!("[Sync] Unsubscribed from {}", path);
        }
    });
    handle
}

/// 建立同步上下文并开始订阅
pub fn provide_sync(auth: AuthContext) -> SyncContext {
    let ctx = SyncContext {
        profile_types: RwSignal::new(Synced::Loading),
        existing_default_profiles: RwSignal::new(Synced::Loading),
        custom_profiles: RwSignal::new(Synced::Loading),
    };
    provide_context(ctx);

    // 1. 目录：先用缓存热启动，再订阅
    if let Some(cached) = LocalStorage::get_json::<Vec<Document<ProfileTemplate>>>(PROFILE_TYPES_CACHE_KEY) {
        log_info!("[Sync] Warm start with {} cached templates", cached.len());
        ctx.profile_types.set(Synced::Ready(cached));
    }
    // 目录订阅与应用同生命周期
    let _catalog = spawn_feed(CollectionPath::profile_types(), ctx.profile_types);

    let profile_types = ctx.profile_types;
    Effect::new(move |_| {
        profile_types.with(|types| {
            if let Synced::Ready(docs) = types {
                LocalStorage::set_json(PROFILE_TYPES_CACHE_KEY, docs);
            }
        })
    });

    // 2. 用户集合：uid 变化时取消旧订阅
    let uid = Memo::new(move |_| auth.uid());
    let user_feeds = StoredValue::new(Vec::<AbortHandle>::new());
    let existing = ctx.existing_default_profiles;
    let custom = ctx.custom_profiles;

    Effect::new(move |_| {
        let uid = uid.get();
        user_feeds.update_value(|handles| {
            for handle in handles.drain(..) {
                handle.abort();
            }
        });
        existing.set(Synced::Loading);
        custom.set(Synced::Loading);

        if let Some(uid) = uid {
            let handles = vec![
                spawn_feed(CollectionPath::user_default_profiles(&uid), existing),
                spawn_feed(CollectionPath::user_custom_profiles(&uid), custom),
            ];
            user_feeds.set_value(handles);
        }
    });

    ctx
}

// =========================================================
// 图标目录
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub enum IconCatalogState {
    #[default]
    Idle,
    Loading,
    Ready(Vec<IconOption>),
    Failed(String),
}

#[derive(Clone, Copy)]
pub struct IconCatalog {
    pub state: RwSignal<IconCatalogState>,
}

impl IconCatalog {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(IconCatalogState::Idle),
        }
    }

    /// 首次调用时拉取；失败后再次调用会重试
    pub fn ensure_loaded(&self, config: &AppConfig) {
        let should_fetch = self.state.with_untracked(|s| {
            matches!(s, IconCatalogState::Idle | IconCatalogState::Failed(_))
        });
        if !should_fetch {
            return;
        }

        self.state.set(IconCatalogState::Loading);
        let state = self.state;
        let url = config.icon_catalog_url.clone();
        let cdn = config.icon_cdn.clone();
        spawn_local(async move {
            match fetch_icon_catalog(&url, &cdn).await {
                Ok(options) => {
                    log_info!("[Icons] Loaded {} icons", options.len());
                    state.set(IconCatalogState::Ready(options));
                }
                Err(e) => {
                    log_error!("[Icons] Failed to load catalog: {}", e);
                    state.set(IconCatalogState::Failed(e.message().to_string()));
                }
            }
        });
    }
}

pub fn use_icon_catalog() -> IconCatalog {
    use_context::<IconCatalog>().expect("IconCatalog should be provided")
}

async fn fetch_icon_catalog(url: &str, cdn: &str) -> SoupResult<Vec<IconOption>> {
    let body = HttpClient::get(url)
        .header("Accept", "application/json")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_icon_catalog(&body, cdn).map_err(|e| e.in_op_with("icons.fetch", url.to_string()))
}
