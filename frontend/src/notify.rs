//! 全局通知（toast）

use std::time::Duration;

use leptos::prelude::*;
use profile_soup_shared::notice::{Notice, NoticeLevel, NoticeQueue};

use crate::components::icons::XMark;

#[derive(Clone, Copy)]
pub struct NoticeContext {
    queue: RwSignal<NoticeQueue>,
}

impl NoticeContext {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(NoticeQueue::new()),
        }
    }

    /// 入队并在到期后自动移除
    pub fn push(&self, message: impl Into<String>, level: NoticeLevel, auto_hide_ms: u32) {
        let message = message.into();
        let Some(id) = self
            .queue
            .try_update(|q| q.push(message, level, auto_hide_ms))
        else {
            return;
        };

        let queue = self.queue;
        set_timeout(
            move || {
                queue.update(|q| {
                    q.dismiss(id);
                });
            },
            Duration::from_millis(auto_hide_ms as u64),
        );
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        log_info!("[Notice] {}", message);
        self.push(message, NoticeLevel::Success, profile_soup_shared::notice::SUCCESS_HIDE_MS);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        log_warn!("[Notice] {}", message);
        self.push(message, NoticeLevel::Error, profile_soup_shared::notice::ERROR_HIDE_MS);
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.update(|q| {
            q.dismiss(id);
        });
    }

    pub fn items(&self) -> Vec<Notice> {
        self.queue.with(|q| q.items().to_vec())
    }
}

pub fn use_notices() -> NoticeContext {
    use_context::<NoticeContext>().expect("NoticeContext should be provided")
}

fn alert_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Default => "alert shadow-lg",
        NoticeLevel::Success => "alert alert-success shadow-lg",
        NoticeLevel::Error => "alert alert-error shadow-lg",
    }
}

/// 右下角的通知栈，每条都可手动关闭
#[component]
pub fn Toaster() -> impl IntoView {
    let notices = use_notices();

    view! {
        <div class="toast toast-bottom toast-end z-50">
            <For
                each=move || notices.items()
                key=|n| n.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div role="alert" class=alert_class(notice.level)>
                            <span>{notice.message}</span>
                            <button
                                class="btn btn-ghost btn-xs btn-circle"
                                aria-label="close"
                                on:click=move |_| notices.dismiss(id)
                            >
                                <XMark attr:class="h-4 w-4" />
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
