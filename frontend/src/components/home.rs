use leptos::prelude::*;
use profile_soup_shared::nav::PopupKind;
use profile_soup_shared::params::ParamKey;
use profile_soup_shared::{AuthStatus, BadgeData, Document, Synced};

use crate::auth::use_auth;
use crate::components::badge::Badge;
use crate::components::icons::Plus;
use crate::sync::use_sync;
use crate::web::router::use_search_params;

/// 落地页：登录后列出用户已创建的全部徽章
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    move || match auth.state.get() {
        AuthStatus::Loading => view! {
            <div class="flex justify-center py-16">
                <span class="loading loading-spinner loading-lg"></span>
            </div>
        }
        .into_any(),
        AuthStatus::Anonymous => view! {
            <div class="hero py-16">
                <div class="hero-content text-center">
                    <div class="max-w-md">
                        <h1 class="text-5xl font-bold">"Hello"</h1>
                        <p class="py-6">"Sign in to start creating your Profile Soup!"</p>
                    </div>
                </div>
            </div>
        }
        .into_any(),
        AuthStatus::Authenticated(_) => view! { <ProfileList /> }.into_any(),
    }
}

/// 把两类 Profile 合并为一个徽章列表，两者都加载完成前返回 None
fn collect_badges<A, B>(defaults: &Synced<A>, customs: &Synced<B>) -> Option<Vec<(String, BadgeData)>>
where
    for<'a> &'a A: Into<BadgeData>,
    for<'a> &'a B: Into<BadgeData>,
{
    let defaults = defaults.ready()?;
    let customs = customs.ready()?;
    let entry = |prefix: &str, id: &str, data: BadgeData| (format!("{}:{}", prefix, id), data);
    Some(
        defaults
            .iter()
            .map(|d: &Document<A>| entry("default", &d.id, (&d.data).into()))
            .chain(
                customs
                    .iter()
                    .map(|d: &Document<B>| entry("custom", &d.id, (&d.data).into())),
            )
            .collect(),
    )
}

#[component]
fn ProfileList() -> impl IntoView {
    let sync = use_sync();
    let params = use_search_params();

    let badges = Memo::new(move |_| {
        sync.existing_default_profiles
            .with(|defaults| sync.custom_profiles.with(|customs| collect_badges(defaults, customs)))
    });

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h2 class="card-title">"Your Profiles"</h2>
                    <button
                        class="btn btn-primary btn-sm gap-2"
                        on:click=move |_| params.set(ParamKey::Popup, PopupKind::AddProfile.as_str(), true)
                    >
                        <Plus attr:class="h-4 w-4" />
                        "Add profile"
                    </button>
                </div>
                {move || match badges.get() {
                    None => view! {
                        <div class="flex justify-center py-8">
                            <span class="loading loading-spinner loading-md"></span>
                        </div>
                    }
                    .into_any(),
                    Some(list) if list.is_empty() => view! {
                        <p class="text-base-content/60 py-8 text-center">
                            "No profiles yet. Add one to get started."
                        </p>
                    }
                    .into_any(),
                    Some(list) => view! {
                        <div class="flex flex-wrap gap-2 pt-4">
                            <For
                                each=move || list.clone()
                                key=|(key, _)| key.clone()
                                children=|(_, data)| view! { <Badge data=data /> }
                            />
                        </div>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_soup_shared::{CreatedDefaultProfile, CustomProfile};

    #[test]
    fn test_badges_wait_for_both_collections() {
        let defaults: Synced<CreatedDefaultProfile> = Synced::Ready(vec![]);
        let customs: Synced<CustomProfile> = Synced::Loading;
        assert!(collect_badges(&defaults, &customs).is_none());
    }

    #[test]
    fn test_badges_merge_default_then_custom() {
        let defaults = Synced::Ready(vec![Document::new(
            "a",
            CreatedDefaultProfile {
                from: "gh".into(),
                name: "GitHub".into(),
                color: "#181717".into(),
                icon: "GitHub".into(),
                link: "https://github.com/octocat".into(),
            },
        )]);
        let customs = Synced::Ready(vec![Document::new(
            "a",
            CustomProfile {
                name: "Blog".into(),
                color: "#5DADE2".into(),
                icon: None,
                link: "https://my.blog".into(),
            },
        )]);

        let badges = collect_badges(&defaults, &customs).unwrap();
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].0, "default:a");
        assert_eq!(badges[0].1.link.as_deref(), Some("https://github.com/octocat"));
        assert_eq!(badges[1].0, "custom:a");
        assert_eq!(badges[1].1.icon, None);
    }
}
