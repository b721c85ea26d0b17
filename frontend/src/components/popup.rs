//! 弹窗调度
//!
//! 显示哪个弹窗完全由 URL 的 `popup` 参数决定。认证状态不满足时
//! （已登录却停在登录弹窗、匿名却停在添加弹窗）通过删除参数来关闭，
//! 关闭本身就是一次导航。

use leptos::prelude::*;
use profile_soup_shared::nav::{PopupDecision, PopupKind, reconcile_popup};
use profile_soup_shared::params::ParamKey;

use crate::auth::use_auth;
use crate::components::add_profile::AddProfilePopup;
use crate::components::login::LoginPopup;
use crate::web::router::use_search_params;

#[component]
pub fn Popup() -> impl IntoView {
    let params = use_search_params();
    let auth = use_auth();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let decision = Memo::new(move |_| {
        let popup = params.get(ParamKey::Popup);
        auth.state.with(|s| reconcile_popup(popup.as_deref(), s))
    });

    Effect::new(move |_| {
        if decision.get() == PopupDecision::Close {
            log_info!("[Popup] Auth state no longer matches the popup, closing");
            params.delete(ParamKey::Popup);
        }
    });

    Effect::new(move |_| {
        let open = matches!(decision.get(), PopupDecision::Show(_));
        if let Some(dialog) = dialog_ref.get() {
            if open {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    // Esc 或点击背景关闭时同步 URL
    let on_close = move |_| {
        if params.get_untracked(ParamKey::Popup).is_some() {
            params.delete(ParamKey::Popup);
        }
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=on_close>
            <div class="modal-box max-w-xl overflow-visible">
                {move || match decision.get() {
                    PopupDecision::Show(PopupKind::Login) => view! { <LoginPopup /> }.into_any(),
                    PopupDecision::Show(PopupKind::AddProfile) => {
                        view! { <AddProfilePopup /> }.into_any()
                    }
                    _ => view! { <></> }.into_any(),
                }}
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
