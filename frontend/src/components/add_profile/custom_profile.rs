//! 自定义 Profile 子流程：名称、链接、图标、颜色全部由用户填写

use leptos::prelude::*;
use leptos::task::spawn_local;
use profile_soup_shared::notice::{created_custom_message, write_failed_message};
use profile_soup_shared::params::ParamKey;
use profile_soup_shared::validation::custom_profile_schema;

use super::form_state::CustomFormState;
use super::icon_select::IconSelect;
use super::input_field::InputField;
use crate::auth::use_auth;
use crate::components::badge::Badge;
use crate::notify::use_notices;
use crate::use_profile_service;
use crate::web::router::use_search_params;

#[component]
pub fn CustomProfileTab() -> impl IntoView {
    let params = use_search_params();
    let notices = use_notices();
    let auth = use_auth();
    let service = use_profile_service();
    let state = CustomFormState::new();
    let color_error = state.error("color");

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        state.submitted.set(true);
        if state.loading.get_untracked() {
            return;
        }
        let form = untrack(|| state.to_form());
        if !custom_profile_schema().is_valid(&form.values()) {
            return;
        }
        let Some(uid) = auth.uid_untracked() else {
            return;
        };

        let service = service.clone();
        state.loading.set(true);
        spawn_local(async move {
            match service.create_custom_profile(&uid, &form).await {
                Ok(profile) => {
                    state.reset();
                    notices.success(created_custom_message(&profile.name));
                    params.delete_many(&[ParamKey::Popup, ParamKey::ProfileTab]);
                }
                Err(e) => {
                    // 保留已填写的值
                    log_error!("[CustomProfile] {}", e);
                    notices.error(write_failed_message(&e.message()));
                    state.loading.set(false);
                }
            }
        });
    };

    view! {
        <h4 class="text-xl font-semibold mt-4 mb-2 text-center">"Create a Custom Profile"</h4>
        <form class="flex flex-col items-center w-full" on:submit=on_submit>
            <InputField
                name="name"
                value=state.name
                on_input=Callback::new(move |v| state.name.set(v))
                error=state.error("name")
            />
            <InputField
                name="link"
                value=state.link
                on_input=Callback::new(move |v| state.link.set(v))
                error=state.error("link")
            />
            <IconSelect selected=state.icon />
            <div class="flex items-center justify-center gap-2 my-2">
                <label for="field-color">"Color:"</label>
                <input
                    id="field-color"
                    name="color"
                    type="color"
                    class="w-10 h-8 cursor-pointer"
                    prop:value=move || state.color.get()
                    on:input=move |ev| state.color.set(event_target_value(&ev))
                />
            </div>
            <Show when=move || color_error.with(Option::is_some)>
                <p class="text-error text-sm">{move || color_error.get().unwrap_or_default()}</p>
            </Show>
            <div class="my-2">
                <Badge data=state.preview() />
            </div>
            <button type="submit" class="btn btn-primary btn-sm my-2" disabled=move || state.loading.get()>
                <Show when=move || state.loading.get()>
                    <span class="loading loading-spinner loading-xs"></span>
                </Show>
                "Create"
            </button>
        </form>
    }
}
