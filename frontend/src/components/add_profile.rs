//! 添加 Profile 弹窗
//!
//! 两个标签页：从模板目录实例化（Default）或完全自定义（Custom）。
//! 当前标签页存放在 URL 的 `profileTab` 参数中，非法值或无可用模板时
//! 用 replaceState 改写为合法值。

mod custom_profile;
mod default_profiles;
mod form_state;
mod icon_select;
mod input_field;

use leptos::prelude::*;
use profile_soup_shared::nav::{ProfileTab, TabResolution, resolve_profile_tab};
use profile_soup_shared::params::ParamKey;

use crate::sync::use_sync;
use crate::web::router::use_search_params;

use custom_profile::CustomProfileTab;
use default_profiles::DefaultProfiles;

#[component]
pub fn AddProfilePopup() -> impl IntoView {
    let params = use_search_params();
    let available = use_sync().available_templates();

    // None 表示数据尚未加载完成
    let resolution = Memo::new(move |_| {
        let has_templates = available.with(|a| a.as_ref().map(|list| !list.is_empty()))?;
        let param = params.get(ParamKey::ProfileTab);
        Some(resolve_profile_tab(param.as_deref(), has_templates))
    });

    Effect::new(move |_| {
        if let Some(TabResolution {
            correction: Some(tab),
            ..
        }) = resolution.get()
        {
            log_info!("[AddProfile] Correcting profileTab to {}", tab.as_str());
            params.set(ParamKey::ProfileTab, tab.as_str(), false);
        }
    });

    let tab = Memo::new(move |_| resolution.get().map(|r| r.tab));
    let has_templates =
        Signal::derive(move || available.with(|a| a.as_ref().is_some_and(|list| !list.is_empty())));
    let templates = Signal::derive(move || available.get().unwrap_or_default());

    let tab_class = move |target: ProfileTab| {
        move || {
            let mut class = String::from("tab");
            if tab.get() == Some(target) {
                class.push_str(" tab-active");
            }
            if target == ProfileTab::Default && !has_templates.get() {
                class.push_str(" tab-disabled");
            }
            class
        }
    };

    let select_tab = move |target: ProfileTab| {
        if target == ProfileTab::Default && !has_templates.get_untracked() {
            return;
        }
        params.set(ParamKey::ProfileTab, target.as_str(), true);
    };

    view! {
        <h3 class="font-bold text-lg text-center">"Add a New Profile"</h3>
        <div class="flex flex-col items-center pt-2">
            {move || match tab.get() {
                None => view! { <span class="loading loading-spinner loading-lg my-8"></span> }
                    .into_any(),
                Some(current) => view! {
                    <div role="tablist" class="tabs tabs-bordered">
                        <a
                            role="tab"
                            class=tab_class(ProfileTab::Default)
                            on:click=move |_| select_tab(ProfileTab::Default)
                        >
                            "Default"
                        </a>
                        <a
                            role="tab"
                            class=tab_class(ProfileTab::Custom)
                            on:click=move |_| select_tab(ProfileTab::Custom)
                        >
                            "Custom"
                        </a>
                    </div>
                    <div class="w-full flex flex-col items-center">
                        {match current {
                            ProfileTab::Default => view! { <DefaultProfiles templates=templates /> }
                                .into_any(),
                            ProfileTab::Custom => view! { <CustomProfileTab /> }.into_any(),
                        }}
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
