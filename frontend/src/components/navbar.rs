use leptos::prelude::*;
use leptos::task::spawn_local;
use profile_soup_shared::nav::PopupKind;
use profile_soup_shared::params::ParamKey;
use profile_soup_shared::{AuthStatus, SessionUser};

use crate::auth::{sign_out, use_auth};
use crate::components::icons::{Login, Logout, Plus};
use crate::notify::use_notices;
use crate::web::router::{Link, use_search_params};

/// 顶部导航栏：认证加载中显示转圈，匿名显示登录按钮，已登录显示头像菜单
#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1">
                <Link to="/home" class="btn btn-ghost text-xl font-bold text-primary">
                    "Profile Soup"
                </Link>
            </div>
            <div class="flex-none">
                {move || match auth.state.get() {
                    AuthStatus::Loading => {
                        view! { <span class="loading loading-spinner loading-md"></span> }.into_any()
                    }
                    AuthStatus::Anonymous => view! { <LoginButton /> }.into_any(),
                    AuthStatus::Authenticated(user) => view! { <UserMenu user=user /> }.into_any(),
                }}
            </div>
        </div>
    }
}

#[component]
fn LoginButton() -> impl IntoView {
    let params = use_search_params();

    view! {
        <div class="tooltip tooltip-bottom" data-tip="Login">
            <button
                class="btn btn-ghost btn-circle"
                aria-label="Login"
                on:click=move |_| params.set(ParamKey::Popup, PopupKind::Login.as_str(), true)
            >
                <Login attr:class="h-6 w-6" />
            </button>
        </div>
    }
}

#[component]
fn UserMenu(user: SessionUser) -> impl IntoView {
    let params = use_search_params();
    let notices = use_notices();

    let alt = user
        .display_name
        .clone()
        .unwrap_or_else(|| "Profile Picture".to_string());
    let initial = alt.chars().next().unwrap_or('?').to_string();

    let on_sign_out = move |_| {
        spawn_local(async move {
            if let Err(e) = sign_out().await {
                log_error!("[NavBar] {}", e);
                notices.error(e.message().to_string());
            }
        });
    };

    view! {
        <div class="dropdown dropdown-end">
            <div tabindex="0" role="button" class="btn btn-ghost btn-circle avatar">
                {match user.photo_url {
                    Some(src) => view! {
                        <div class="w-10 rounded-full">
                            <img alt=alt src=src />
                        </div>
                    }
                    .into_any(),
                    None => view! {
                        <div class="w-10 rounded-full bg-neutral text-neutral-content flex items-center justify-center">
                            <span>{initial}</span>
                        </div>
                    }
                    .into_any(),
                }}
            </div>
            <ul tabindex="0" class="dropdown-content z-[1] menu p-2 shadow bg-base-100 rounded-box w-52 mt-2">
                <li>
                    <a on:click=move |_| params.set(ParamKey::Popup, PopupKind::AddProfile.as_str(), true)>
                        <Plus attr:class="h-4 w-4" />
                        "Add profile"
                    </a>
                </li>
                <li>
                    <a on:click=on_sign_out class="text-error">
                        <Logout attr:class="h-4 w-4" />
                        "Sign out"
                    </a>
                </li>
            </ul>
        </div>
    }
}
