//! 默认模板子流程
//!
//! `createProfile` 参数为空时展示可用模板目录；指向某个模板时展示其占位符表单。
//! 没有占位符的模板无需填写，进入即直接创建。

use leptos::prelude::*;
use leptos::task::spawn_local;
use profile_soup_shared::catalog::find_template;
use profile_soup_shared::link::LinkPattern;
use profile_soup_shared::notice::{added_default_message, write_failed_message};
use profile_soup_shared::params::ParamKey;
use profile_soup_shared::validation::{FormSchema, FormValues};
use profile_soup_shared::{BadgeData, Document, ProfileTemplate, SoupError, SoupErrorStatus};

use super::form_state::TokenFormState;
use super::input_field::InputField;
use crate::auth::use_auth;
use crate::components::badge::Badge;
use crate::components::icons::ArrowLeft;
use crate::notify::{NoticeContext, use_notices};
use crate::use_profile_service;
use crate::web::router::{SearchParamsHandle, use_search_params};

#[component]
pub fn DefaultProfiles(#[prop(into)] templates: Signal<Vec<Document<ProfileTemplate>>>) -> impl IntoView {
    let params = use_search_params();

    let selected = Memo::new(move |_| {
        let name = params.nav_state().create_profile?;
        templates.with(|list| find_template(list, &name).cloned())
    });

    move || match selected.get() {
        Some(template) => view! { <TemplateInstantiation template=template /> }.into_any(),
        None => view! { <TemplateCatalog templates=templates /> }.into_any(),
    }
}

#[component]
fn TemplateCatalog(templates: Signal<Vec<Document<ProfileTemplate>>>) -> impl IntoView {
    let params = use_search_params();

    view! {
        <h4 class="text-xl font-semibold mt-4 mb-2 text-center">"Add a Default Profile"</h4>
        <div class="flex flex-col items-center gap-1">
            <For
                each=move || templates.get()
                key=|t| t.id.clone()
                children=move |template| {
                    let name = template.data.name.clone();
                    let data = BadgeData::from(&template.data);
                    view! {
                        <button
                            type="button"
                            class="btn btn-ghost h-auto p-1"
                            on:click=move |_| params.set(ParamKey::CreateProfile, &name, true)
                        >
                            <Badge data=data />
                        </button>
                    }
                }
            />
        </div>
    }
}

/// 标题与返回目录的箭头
#[component]
fn InstantiationHeading(name: String) -> impl IntoView {
    let params = use_search_params();

    view! {
        <div class="relative w-[85%] mt-4 mb-2 text-center">
            <div class="tooltip absolute left-[-13%] top-1/2 -translate-y-1/2" data-tip="View all Default Profiles">
                <button
                    type="button"
                    class="btn btn-ghost btn-sm btn-circle"
                    aria-label="View all Default Profiles"
                    on:click=move |_| params.delete(ParamKey::CreateProfile)
                >
                    <ArrowLeft attr:class="h-4 w-4" />
                </button>
            </div>
            <h4 class="text-xl font-semibold break-words">{format!("Add Your {} Profile", name)}</h4>
        </div>
    }
}

#[component]
fn TemplateInstantiation(template: Document<ProfileTemplate>) -> impl IntoView {
    let pattern = LinkPattern::parse(&template.data.base_url);

    if pattern.has_tokens() {
        let tokens = pattern.tokens();
        view! { <TokenForm template=template pattern=pattern tokens=tokens /> }.into_any()
    } else {
        view! { <AutoCreate template=template /> }.into_any()
    }
}

/// 写入成功：提示并关闭整个流程
fn finish_flow(notices: NoticeContext, params: SearchParamsHandle, name: &str) {
    notices.success(added_default_message(name));
    params.delete_many(&ParamKey::ALL);
}

fn is_duplicate(err: &SoupError) -> bool {
    err.status == SoupErrorStatus::Conflict
}

/// 自动创建是否应展示失败：重复提交说明首次写入仍在进行，继续等待
fn auto_create_failed(err: &SoupError) -> bool {
    !is_duplicate(err)
}

#[component]
fn TokenForm(
    template: Document<ProfileTemplate>,
    pattern: LinkPattern,
    tokens: Vec<String>,
) -> impl IntoView {
    let params = use_search_params();
    let notices = use_notices();
    let auth = use_auth();
    let service = use_profile_service();

    let schema = FormSchema::for_tokens(&tokens);
    let state = TokenFormState::new(&tokens);

    let base = BadgeData::from(&template.data);
    let preview = Signal::derive(move || BadgeData {
        link: Some(state.values.with(|v| pattern.preview(v))),
        ..base.clone()
    });

    let name = template.data.name.clone();
    let submit_schema = schema.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        state.submitted.set(true);
        if state.loading.get_untracked() {
            return;
        }
        let values: FormValues = state.values.get_untracked();
        if !submit_schema.is_valid(&values) {
            return;
        }
        let Some(uid) = auth.uid_untracked() else {
            return;
        };

        let template = template.clone();
        let service = service.clone();
        state.loading.set(true);
        spawn_local(async move {
            match service.create_default_profile(&uid, &template, &values).await {
                Ok(profile) => {
                    state.reset();
                    finish_flow(notices, params, &profile.name);
                }
                Err(e) if is_duplicate(&e) => {
                    log_warn!("[DefaultProfiles] Duplicate submission ignored: {}", e);
                    state.loading.set(false);
                }
                Err(e) => {
                    log_error!("[DefaultProfiles] {}", e);
                    // 表单提交失败允许重试
                    service.release(&template.id);
                    notices.error(write_failed_message(&e.message()));
                    state.loading.set(false);
                }
            }
        });
    };

    let fields = tokens
        .into_iter()
        .map(|token| {
            view! {
                <InputField
                    name=token.clone()
                    value=state.value(token.clone())
                    on_input=state.setter(token.clone())
                    error=state.error(schema.clone(), token)
                />
            }
        })
        .collect_view();

    view! {
        <InstantiationHeading name=name />
        <form class="flex flex-col items-center w-full" on:submit=on_submit>
            {fields}
            <div class="my-2">
                <Badge data=preview />
            </div>
            <button type="submit" class="btn btn-primary btn-sm my-2" disabled=move || state.loading.get()>
                <Show when=move || state.loading.get()>
                    <span class="loading loading-spinner loading-xs"></span>
                </Show>
                "Add"
            </button>
        </form>
    }
}

/// 无占位符的模板：挂载即创建
///
/// 防重复标记保证重复挂载不会再次写入；失败时不回滚标记，避免循环重试。
/// 重复挂载时保持加载状态，由首次写入的结果关闭流程或弹出错误。
#[component]
fn AutoCreate(template: Document<ProfileTemplate>) -> impl IntoView {
    let params = use_search_params();
    let notices = use_notices();
    let auth = use_auth();
    let service = use_profile_service();
    let (failed, set_failed) = signal(false);

    let name = template.data.name.clone();
    if let Some(uid) = auth.uid_untracked() {
        spawn_local(async move {
            match service
                .create_default_profile(&uid, &template, &FormValues::new())
                .await
            {
                Ok(profile) => finish_flow(notices, params, &profile.name),
                Err(e) if !auto_create_failed(&e) => {
                    log_warn!("[DefaultProfiles] Auto-create already submitted: {}", e);
                }
                Err(e) => {
                    log_error!("[DefaultProfiles] {}", e);
                    notices.error(write_failed_message(&e.message()));
                    set_failed.set(true);
                }
            }
        });
    }

    view! {
        <InstantiationHeading name=name />
        <div class="flex flex-col items-center gap-2 py-4">
            <Show
                when=move || failed.get()
                fallback=|| view! { <span class="loading loading-spinner loading-md"></span> }
            >
                <p class="text-error text-sm">"This profile could not be added."</p>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_create_waits_on_duplicate() {
        assert!(!auto_create_failed(&SoupError::conflict("already submitted")));
        assert!(auto_create_failed(&SoupError::store("offline")));
        assert!(auto_create_failed(&SoupError::invalid_input("bad link")));
    }
}
