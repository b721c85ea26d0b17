//! Firebase JS 桥接
//!
//! 页面通过 `<script>` 加载 Firebase compat SDK，这里用 `inline_js` 包一层薄接口，
//! 再实现 shared 中的 `DocumentStore` / `CollectionFeed`。

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use profile_soup_shared::store::{CollectionFeed, CollectionPath, DocumentStore, RawDocument, Snapshot};
use profile_soup_shared::{SessionUser, SignInOutcome, SoupError, SoupResult};
use wasm_bindgen::prelude::*;

use crate::config::FirebaseConfig;
use crate::serde_helper::{from_value, js_error_message, to_value};

#[wasm_bindgen(inline_js = r#"
function sdk() {
    if (typeof firebase === "undefined") {
        throw new Error("Firebase SDK is not loaded");
    }
    return firebase;
}

export function fb_init(config) {
    const fb = sdk();
    if (!fb.apps.length) {
        fb.initializeApp(config);
    }
}

export function fb_on_auth_changed(callback) {
    return sdk().auth().onAuthStateChanged((user) => {
        callback(user ? {
            uid: user.uid,
            displayName: user.displayName,
            photoURL: user.photoURL,
            email: user.email,
        } : null);
    });
}

export async function fb_sign_in_with_google() {
    const fb = sdk();
    const result = await fb.auth().signInWithPopup(new fb.auth.GoogleAuthProvider());
    const info = result.additionalUserInfo || {};
    const profile = info.profile || {};
    return {
        userName: profile.name || (result.user && result.user.displayName) || null,
        isNewUser: !!info.isNewUser,
    };
}

export async function fb_sign_out() {
    await sdk().auth().signOut();
}

export function fb_subscribe(path, onNext, onError) {
    return sdk().firestore().collection(path).onSnapshot(
        (snap) => onNext(snap.docs.map((d) => ({ id: d.id, data: d.data() }))),
        (err) => onError(err),
    );
}

export async function fb_add(path, doc) {
    const ref = await sdk().firestore().collection(path).add(doc);
    return ref.id;
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn fb_init(config: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn fb_on_auth_changed(callback: &Closure<dyn FnMut(JsValue)>) -> Result<js_sys::Function, JsValue>;

    #[wasm_bindgen(catch)]
    async fn fb_sign_in_with_google() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn fb_sign_out() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn fb_subscribe(
        path: &str,
        on_next: &Closure<dyn FnMut(JsValue)>,
        on_error: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<js_sys::Function, JsValue>;

    #[wasm_bindgen(catch)]
    async fn fb_add(path: &str, doc: JsValue) -> Result<JsValue, JsValue>;
}

// =========================================================
// 认证
// =========================================================

pub fn init(config: &FirebaseConfig) -> SoupResult<()> {
    let config = to_value(config)?;
    fb_init(config).map_err(|e| SoupError::store(js_error_message(&e)).in_op("firebase.init"))
}

/// 注册认证状态监听，回调在整个应用生命周期内有效
pub fn on_auth_state_changed(mut callback: impl FnMut(Option<SessionUser>) + 'static) -> SoupResult<()> {
    let closure = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
        if value.is_null() || value.is_undefined() {
            callback(None);
            return;
        }
        match from_value::<SessionUser>(value) {
            Ok(user) => callback(Some(user)),
            Err(e) => {
                log_error!("[Auth] Unreadable user payload: {}", e);
                callback(None);
            }
        }
    });

    fb_on_auth_changed(&closure)
        .map_err(|e| SoupError::auth(js_error_message(&e)).in_op("firebase.on_auth_state_changed"))?;

    // 泄漏闭包以保持监听器存活
    closure.forget();
    Ok(())
}

pub async fn sign_in_with_google() -> SoupResult<SignInOutcome> {
    let value = fb_sign_in_with_google()
        .await
        .map_err(|e| SoupError::auth(js_error_message(&e)).in_op("firebase.sign_in"))?;
    from_value(value)
}

pub async fn sign_out() -> SoupResult<()> {
    fb_sign_out()
        .await
        .map_err(|e| SoupError::auth(js_error_message(&e)).in_op("firebase.sign_out"))?;
    Ok(())
}

// =========================================================
// 文档存储
// =========================================================

/// 一个集合的快照订阅，drop 时取消订阅
pub struct FirestoreFeed {
    rx: mpsc::UnboundedReceiver<SoupResult<Snapshot>>,
    unsubscribe: Option<js_sys::Function>,
    _on_next: Option<Closure<dyn FnMut(JsValue)>>,
    _on_error: Option<Closure<dyn FnMut(JsValue)>>,
}

impl FirestoreFeed {
    fn failed(err: SoupError) -> Self {
        let (tx, rx) = mpsc::unbounded();
        let _ = tx.unbounded_send(Err(err));
        Self {
            rx,
            unsubscribe: None,
            _on_next: None,
            _on_error: None,
        }
    }
}

impl Stream for FirestoreFeed {
    type Item = SoupResult<Snapshot>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_next_unpin(cx)
    }
}

impl Drop for FirestoreFeed {
    fn drop(&mut self) {
        // 先取消订阅，再释放回调
        if let Some(unsubscribe) = self.unsubscribe.take() {
            let _ = unsubscribe.call0(&JsValue::NULL);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FirestoreStore;

#[async_trait(?Send)]
impl DocumentStore for FirestoreStore {
    async fn append(&self, path: &CollectionPath, document: serde_json::Value) -> SoupResult<String> {
        let doc = to_value(&document)?;
        let id = fb_add(path.as_str(), doc)
            .await
            .map_err(|e| SoupError::store(js_error_message(&e)).in_op_with("firestore.add", path.to_string()))?;
        let id = id.as_string().unwrap_or_default();
        log_info!("[Store] Appended {}/{}", path, id);
        Ok(id)
    }
}

impl CollectionFeed for FirestoreStore {
    type Stream = FirestoreFeed;

    fn subscribe(&self, path: &CollectionPath) -> Self::Stream {
        let (tx, rx) = mpsc::unbounded::<SoupResult<Snapshot>>();

        let next_tx = tx.clone();
        let next_path = path.clone();
        let on_next = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let snapshot = from_value::<Vec<RawDocument>>(value)
                .map_err(|e| e.in_op_with("firestore.snapshot", next_path.to_string()));
            let _ = next_tx.unbounded_send(snapshot);
        });

        let error_path = path.clone();
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
            let err = SoupError::store(js_error_message(&err))
                .in_op_with("firestore.subscribe", error_path.to_string());
            let _ = tx.unbounded_send(Err(err));
        });

        match fb_subscribe(path.as_str(), &on_next, &on_error) {
            Ok(unsubscribe) => FirestoreFeed {
                rx,
                unsubscribe: Some(unsubscribe),
                _on_next: Some(on_next),
                _on_error: Some(on_error),
            },
            Err(e) => FirestoreFeed::failed(
                SoupError::store(js_error_message(&e)).in_op_with("firestore.subscribe", path.to_string()),
            ),
        }
    }
}
