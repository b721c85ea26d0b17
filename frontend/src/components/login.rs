use leptos::prelude::*;
use leptos::task::spawn_local;
use profile_soup_shared::notice::{NoticeLevel, WELCOME_HIDE_MS, welcome_message};

use crate::auth::sign_in;
use crate::components::icons::Login;
use crate::notify::use_notices;

/// 登录弹窗
///
/// 登录成功后认证监听会推送新用户，弹窗随之由调度器关闭。
#[component]
pub fn LoginPopup() -> impl IntoView {
    let notices = use_notices();
    let (loading, set_loading) = signal(false);

    let on_sign_in = move |_| {
        set_loading.set(true);
        spawn_local(async move {
            match sign_in().await {
                Ok(outcome) => {
                    if outcome.is_new_user {
                        let name = outcome.user_name.unwrap_or_default();
                        notices.push(welcome_message(&name), NoticeLevel::Default, WELCOME_HIDE_MS);
                    }
                }
                Err(e) => {
                    log_error!("[Login] {}", e);
                    notices.error(e.message().to_string());
                }
            }
            set_loading.set(false);
        });
    };

    view! {
        <h3 class="font-bold text-lg">
            "Sign in with Google to start creating your Profile Soup!"
        </h3>
        <div class="modal-action">
            <button
                class="btn btn-primary gap-2"
                disabled=move || loading.get()
                on:click=on_sign_in
            >
                <Show
                    when=move || loading.get()
                    fallback=|| view! { <Login attr:class="h-4 w-4" /> }
                >
                    <span class="loading loading-spinner loading-sm"></span>
                </Show>
                "Sign in with Google"
            </button>
        </div>
    }
}
