use super::*;
use crate::catalog::available_templates;
use crate::nav::{ProfileTab, resolve_profile_tab};
use crate::params::{ParamKey, SearchParams};
use crate::store::{CollectionFeed, RawDocument, Snapshot, decode_snapshot};
use crate::{SoupErrorStatus, SoupResult};
use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// =========================================================
// Shared Mock Components
// =========================================================

/// In-memory document store; every append notifies current subscribers
#[derive(Default)]
struct MemoryBackend {
    collections: RefCell<HashMap<String, Snapshot>>,
    subscribers: RefCell<Vec<(String, mpsc::UnboundedSender<SoupResult<Snapshot>>)>>,
    /// When set, the next append fails with this message
    fail_next: RefCell<Option<String>>,
    appends: RefCell<u32>,
}

impl MemoryBackend {
    fn snapshot(&self, path: &str) -> Snapshot {
        self.collections.borrow().get(path).cloned().unwrap_or_default()
    }

    fn publish(&self, path: &str) {
        let snapshot = self.snapshot(path);
        self.subscribers
            .borrow_mut()
            .retain(|(p, tx)| p != path || tx.unbounded_send(Ok(snapshot.clone())).is_ok());
    }
}

#[derive(Clone, Default)]
struct MemoryStore(Rc<MemoryBackend>);

#[async_trait(?Send)]
impl DocumentStore for MemoryStore {
    async fn append(&self, path: &CollectionPath, document: serde_json::Value) -> SoupResult<String> {
        if let Some(msg) = self.0.fail_next.borrow_mut().take() {
            return Err(SoupError::store(msg).in_op("memory.append"));
        }

        *self.0.appends.borrow_mut() += 1;
        let id = format!("doc-{}", self.0.appends.borrow());
        self.0
            .collections
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push(RawDocument {
                id: id.clone(),
                data: document,
            });
        self.0.publish(path.as_str());
        Ok(id)
    }
}

impl CollectionFeed for MemoryStore {
    type Stream = mpsc::UnboundedReceiver<SoupResult<Snapshot>>;

    fn subscribe(&self, path: &CollectionPath) -> Self::Stream {
        let (tx, rx) = mpsc::unbounded();
        let _ = tx.unbounded_send(Ok(self.0.snapshot(path.as_str())));
        self.0.subscribers.borrow_mut().push((path.to_string(), tx));
        rx
    }
}

fn github() -> Document<ProfileTemplate> {
    Document::new(
        "github-id",
        ProfileTemplate {
            name: "GitHub".into(),
            color: "#181717".into(),
            icon: "GitHub".into(),
            base_url: "https://github.com/__username__".into(),
        },
    )
}

fn homepage() -> Document<ProfileTemplate> {
    Document::new(
        "home-id",
        ProfileTemplate {
            name: "Homepage".into(),
            color: "#333333".into(),
            icon: String::new(),
            base_url: "https://example.com".into(),
        },
    )
}

fn values(pairs: &[(&str, &str)]) -> FormValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =========================================================
// Default profiles
// =========================================================

#[tokio::test]
async fn test_template_without_tokens_keeps_base_url() {
    let store = MemoryStore::default();
    let service = ProfileService::new(store.clone());

    let created = service
        .create_default_profile("u1", &homepage(), &FormValues::new())
        .await
        .unwrap();

    assert_eq!(created.link, "https://example.com");
    assert_eq!(created.from, "home-id");

    let stored = store.0.snapshot("users/u1/defaultProfiles");
    assert_eq!(stored.len(), 1);
    assert!(stored[0].data.get("baseURL").is_none());
    assert!(stored[0].data.get("id").is_none());
}

#[tokio::test]
async fn test_github_scenario_writes_filled_link() {
    let store = MemoryStore::default();
    let service = ProfileService::new(store.clone());

    // Opening Add-Profile with a non-empty catalog resolves to the default tab
    let mut params = SearchParams::parse("?popup=addProfile");
    let available = available_templates(&[github()], &[]);
    let tab = resolve_profile_tab(params.get(ParamKey::ProfileTab), !available.is_empty());
    assert_eq!(tab.correction, Some(ProfileTab::Default));
    params.set(ParamKey::ProfileTab, tab.tab.as_str());
    params.set(ParamKey::CreateProfile, "GitHub");

    service
        .create_default_profile("u1", &available[0], &values(&[("username", "octocat")]))
        .await
        .unwrap();

    let stored = store.0.snapshot("users/u1/defaultProfiles");
    assert_eq!(
        stored[0].data,
        serde_json::json!({
            "from": "github-id",
            "name": "GitHub",
            "color": "#181717",
            "icon": "GitHub",
            "link": "https://github.com/octocat"
        })
    );

    // Success closes the whole flow
    for key in ParamKey::ALL {
        params.delete(key);
    }
    assert_eq!(params.to_search(), "");
}

#[tokio::test]
async fn test_second_submission_is_suppressed() {
    let store = MemoryStore::default();
    let service = ProfileService::new(store.clone());
    let form = values(&[("username", "octocat")]);

    service.create_default_profile("u1", &github(), &form).await.unwrap();
    let err = service
        .create_default_profile("u1", &github(), &form)
        .await
        .unwrap_err();

    assert_eq!(err.status, SoupErrorStatus::Conflict);
    assert_eq!(*store.0.appends.borrow(), 1);
}

#[tokio::test]
async fn test_invalid_values_do_not_take_the_guard() {
    let service = ProfileService::new(MemoryStore::default());

    let err = service
        .create_default_profile("u1", &github(), &values(&[("username", "o")]))
        .await
        .unwrap_err();

    assert_eq!(err.status, SoupErrorStatus::InvalidInput);
    assert!(!service.is_submitted("github-id"));
}

#[tokio::test]
async fn test_failed_write_keeps_guard_until_released() {
    let store = MemoryStore::default();
    let service = ProfileService::new(store.clone());
    let form = values(&[("username", "octocat")]);

    *store.0.fail_next.borrow_mut() = Some("PERMISSION_DENIED".into());
    let err = service
        .create_default_profile("u1", &github(), &form)
        .await
        .unwrap_err();
    assert_eq!(err.status, SoupErrorStatus::Store);
    assert!(err.to_string().contains("PERMISSION_DENIED"));
    assert!(service.is_submitted("github-id"));

    // Without an explicit revert the retry is still blocked
    assert!(service.create_default_profile("u1", &github(), &form).await.is_err());

    service.release("github-id");
    service.create_default_profile("u1", &github(), &form).await.unwrap();
    assert_eq!(*store.0.appends.borrow(), 1);
}

#[tokio::test]
async fn test_created_profile_leaves_catalog_through_feed() {
    let store = MemoryStore::default();
    let service = ProfileService::new(store.clone());
    let mut feed = store.subscribe(&CollectionPath::user_default_profiles("u1"));

    let first = feed.next().await.unwrap().unwrap();
    assert!(first.is_empty());

    service
        .create_default_profile("u1", &github(), &values(&[("username", "octocat")]))
        .await
        .unwrap();

    let second = feed.next().await.unwrap().unwrap();
    let (existing, errors) = decode_snapshot::<CreatedDefaultProfile>(&second);
    assert!(errors.is_empty());

    let available = available_templates(&[github(), homepage()], &existing);
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, "home-id");
}

// =========================================================
// Custom profiles
// =========================================================

#[tokio::test]
async fn test_custom_profile_with_empty_name_is_not_written() {
    let store = MemoryStore::default();
    let service = ProfileService::new(store.clone());

    let form = CustomProfileForm {
        link: "https://my.blog".into(),
        ..Default::default()
    };
    let err = service.create_custom_profile("u1", &form).await.unwrap_err();

    assert_eq!(err.status, SoupErrorStatus::InvalidInput);
    assert_eq!(err.message(), "Name is required");
    assert_eq!(*store.0.appends.borrow(), 0);
}

#[tokio::test]
async fn test_custom_profile_maps_icon_to_label() {
    let store = MemoryStore::default();
    let service = ProfileService::new(store.clone());

    let form = CustomProfileForm {
        name: "My Blog".into(),
        link: "https://my.blog".into(),
        icon: Some(IconOption {
            value: "hashnode".into(),
            label: "Hashnode".into(),
            svg_url: "https://cdn/hashnode.svg".into(),
        }),
        ..Default::default()
    };
    let created = service.create_custom_profile("u1", &form).await.unwrap();
    assert_eq!(created.icon.as_deref(), Some("Hashnode"));
    assert_eq!(created.color, crate::DEFAULT_CUSTOM_COLOR);

    let stored = store.0.snapshot("users/u1/customProfiles");
    assert_eq!(stored[0].data["icon"], "Hashnode");
}

#[test]
fn test_custom_preview_uses_selected_slug() {
    let form = CustomProfileForm {
        name: "Runtime".into(),
        icon: Some(IconOption {
            value: "nodedotjs".into(),
            label: "Node.js".into(),
            svg_url: "https://cdn/nodedotjs.svg".into(),
        }),
        ..Default::default()
    };
    let preview = form.preview();
    assert_eq!(preview.icon.as_deref(), Some("nodedotjs"));
    assert_eq!(preview.link, None);

    let img = crate::badge::badge_image(&preview, &crate::badge::BadgeStyle::default()).unwrap();
    assert!(img.src.ends_with("&logo=nodedotjs"));
    assert_eq!(form.to_profile().icon.as_deref(), Some("Node.js"));
}

#[tokio::test]
async fn test_custom_profile_failure_is_reported() {
    let store = MemoryStore::default();
    let service = ProfileService::new(store.clone());
    *store.0.fail_next.borrow_mut() = Some("offline".into());

    let form = CustomProfileForm {
        name: "Blog".into(),
        link: "https://my.blog".into(),
        ..Default::default()
    };
    let err = service.create_custom_profile("u1", &form).await.unwrap_err();
    assert_eq!(err.status, SoupErrorStatus::Store);
    assert!(store.0.snapshot("users/u1/customProfiles").is_empty());
}

#[test]
fn test_guard_acquire_release() {
    let guard = SubmissionGuard::new();
    assert!(guard.try_acquire("a"));
    assert!(!guard.try_acquire("a"));
    assert!(guard.contains("a"));
    guard.release("a");
    assert!(guard.try_acquire("a"));
}
