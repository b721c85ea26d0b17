//! 可搜索、可清空的图标选择器
//!
//! 图标目录有数千项，下拉列表只渲染可视窗口内的行（固定行高 50px），
//! 打开时滚动到已选项。

use leptos::prelude::*;
use profile_soup_shared::catalog::{IconOption, VirtualWindow, filter_icons, initial_scroll_offset};

use crate::components::icons::{ChevronDown, XMark};
use crate::sync::{IconCatalogState, use_icon_catalog};
use crate::use_config;

const ITEM_HEIGHT: f64 = 50.0;
const VIEWPORT_HEIGHT: f64 = 300.0;
const OVERSCAN: usize = 4;

#[component]
pub fn IconSelect(selected: RwSignal<Option<IconOption>>) -> impl IntoView {
    let catalog = use_icon_catalog();
    let config = use_config();

    let (open, set_open) = signal(false);
    let (query, set_query) = signal(String::new());
    let (scroll_top, set_scroll_top) = signal(0.0_f64);
    let list_ref = NodeRef::<leptos::html::Div>::new();
    let search_ref = NodeRef::<leptos::html::Input>::new();

    let filtered = Memo::new(move |_| {
        let query = query.get();
        catalog.state.with(|state| match state {
            IconCatalogState::Ready(options) => {
                filter_icons(options, &query).into_iter().cloned().collect::<Vec<_>>()
            }
            _ => Vec::new(),
        })
    });

    let window = Memo::new(move |_| {
        VirtualWindow::compute(
            scroll_top.get(),
            VIEWPORT_HEIGHT,
            ITEM_HEIGHT,
            filtered.with(Vec::len),
            OVERSCAN,
        )
    });

    let toggle = move |_| {
        if open.get_untracked() {
            set_open.set(false);
            return;
        }
        catalog.ensure_loaded(&config);
        set_query.set(String::new());
        set_open.set(true);
    };

    // 打开后定位到已选项
    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        let index = selected.with_untracked(|sel| {
            sel.as_ref()
                .and_then(|s| filtered.with_untracked(|list| list.iter().position(|o| o == s)))
        });
        let offset = initial_scroll_offset(index, ITEM_HEIGHT);
        if let Some(list) = list_ref.get() {
            list.set_scroll_top(offset as i32);
        }
        set_scroll_top.set(offset);
        if let Some(input) = search_ref.get() {
            let _ = input.focus();
        }
    });

    let on_scroll = move |_| {
        if let Some(list) = list_ref.get() {
            set_scroll_top.set(list.scroll_top() as f64);
        }
    };

    let choose = move |option: IconOption| {
        selected.set(Some(option));
        set_open.set(false);
    };

    let rows = move || {
        let w = window.get();
        filtered.with(|items| {
            let end = w.end.min(items.len());
            let start = w.start.min(end);
            items[start..end]
                .iter()
                .cloned()
                .map(|option| {
                    let label = option.label.clone();
                    let svg = option.svg_url.clone();
                    let row_class = if selected.with(|s| s.as_ref() == Some(&option)) {
                        "flex items-center gap-2 w-full px-3 text-left bg-base-200"
                    } else {
                        "flex items-center gap-2 w-full px-3 text-left hover:bg-base-200"
                    };
                    view! {
                        <button
                            type="button"
                            class=row_class
                            style=format!("height: {}px", ITEM_HEIGHT)
                            on:click=move |_| choose(option.clone())
                        >
                            <img src=svg alt="" class="w-6 h-6" loading="lazy" />
                            <span>{label}</span>
                        </button>
                    }
                })
                .collect_view()
        })
    };

    let status = move || {
        catalog.state.with(|state| match state {
            IconCatalogState::Idle | IconCatalogState::Loading => Some(
                view! {
                    <div class="flex justify-center py-4">
                        <span class="loading loading-spinner loading-sm"></span>
                    </div>
                }
                .into_any(),
            ),
            IconCatalogState::Failed(message) => Some(
                view! { <p class="p-3 text-error text-sm">{format!("Could not load icons: {}", message)}</p> }
                    .into_any(),
            ),
            IconCatalogState::Ready(_) if filtered.with(Vec::is_empty) => Some(
                view! { <p class="p-3 text-base-content/60 text-sm">"No icons found"</p> }.into_any(),
            ),
            IconCatalogState::Ready(_) => None,
        })
    };

    view! {
        <div class="relative w-full my-2">
            <div class="input input-bordered w-full flex items-center gap-2 cursor-pointer" on:click=toggle>
                {move || match selected.get() {
                    Some(option) => view! {
                        <img src=option.svg_url alt="" class="w-5 h-5" />
                        <span class="grow">{option.label}</span>
                    }
                    .into_any(),
                    None => view! { <span class="grow text-base-content/50">"Icon"</span> }.into_any(),
                }}
                <Show when=move || selected.with(Option::is_some)>
                    <button
                        type="button"
                        class="btn btn-ghost btn-xs btn-circle"
                        aria-label="Clear icon"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            selected.set(None);
                        }
                    >
                        <XMark attr:class="h-4 w-4" />
                    </button>
                </Show>
                <ChevronDown attr:class="h-4 w-4 opacity-60" />
            </div>

            <Show when=move || open.get()>
                <div class="absolute z-10 mt-1 w-full rounded-box bg-base-100 shadow-xl border border-base-300">
                    <input
                        node_ref=search_ref
                        type="text"
                        placeholder="Search icons"
                        class="input input-sm input-bordered w-full rounded-b-none"
                        prop:value=move || query.get()
                        on:input=move |ev| {
                            set_query.set(event_target_value(&ev));
                            set_scroll_top.set(0.0);
                            if let Some(list) = list_ref.get() {
                                list.set_scroll_top(0);
                            }
                        }
                    />
                    {status}
                    <div
                        node_ref=list_ref
                        class="overflow-y-auto"
                        style=format!("max-height: {}px", VIEWPORT_HEIGHT)
                        on:scroll=on_scroll
                    >
                        <div style=move || format!("height: {}px; position: relative;", window.get().total_height)>
                            <div style=move || {
                                format!(
                                    "position: absolute; top: {}px; left: 0; right: 0;",
                                    window.get().offset_top,
                                )
                            }>{rows}</div>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
