use leptos::prelude::*;
use profile_soup_shared::BadgeData;
use profile_soup_shared::badge::{LINK_REL, LINK_TARGET, badge_image};

use crate::use_config;

/// 徽章图片；有链接时包一层新窗口打开的外链，名称为空时不渲染
#[component]
pub fn Badge(#[prop(into)] data: Signal<BadgeData>) -> impl IntoView {
    let style = use_config().badge;

    move || {
        let Some(image) = data.with(|d| badge_image(d, &style)) else {
            return view! { <></> }.into_any();
        };

        let img = view! { <img src=image.src alt=image.alt class="h-7" /> };
        match image.href {
            Some(href) => view! {
                <a href=href target=LINK_TARGET rel=LINK_REL>
                    {img}
                </a>
            }
            .into_any(),
            None => img.into_any(),
        }
    }
}
