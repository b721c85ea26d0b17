//! 通知队列
//!
//! 写入结果与登录失败以短暂的 toast 呈现：可手动关闭，到时自动消失，不做持久化。

pub const SUCCESS_HIDE_MS: u32 = 3000;
pub const ERROR_HIDE_MS: u32 = 4000;
pub const WELCOME_HIDE_MS: u32 = 6000;

/// 同时可见的最大数量，超出时淘汰最旧的
pub const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Default,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub level: NoticeLevel,
    pub auto_hide_ms: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeQueue {
    next_id: u64,
    items: Vec<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入队并返回新通知的 ID
    pub fn push(&mut self, message: impl Into<String>, level: NoticeLevel, auto_hide_ms: u32) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notice {
            id,
            message: message.into(),
            level,
            auto_hide_ms,
        });
        if self.items.len() > MAX_VISIBLE {
            let overflow = self.items.len() - MAX_VISIBLE;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeLevel::Success, SUCCESS_HIDE_MS)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeLevel::Error, ERROR_HIDE_MS)
    }

    /// 已关闭的 ID 再次关闭时无副作用
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }
}

// --- 文案 ---

pub fn added_default_message(name: &str) -> String {
    format!("Added '{}' Profile!", name)
}

pub fn created_custom_message(name: &str) -> String {
    format!("Created new profile '{}'!", name)
}

pub fn write_failed_message(err: &impl std::fmt::Display) -> String {
    format!("An error occurred: {}", err)
}

pub fn welcome_message(name: &str) -> String {
    format!("Welcome to Profile Soup, {}!", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut queue = NoticeQueue::new();
        let a = queue.success(added_default_message("GitHub"));
        let b = queue.error(write_failed_message(&"offline"));

        assert_eq!(queue.items().len(), 2);
        assert_eq!(queue.items()[0].message, "Added 'GitHub' Profile!");
        assert_eq!(queue.items()[1].message, "An error occurred: offline");
        assert_eq!(queue.items()[1].auto_hide_ms, ERROR_HIDE_MS);

        assert!(queue.dismiss(a));
        assert!(!queue.dismiss(a));
        assert_eq!(queue.items()[0].id, b);
    }

    #[test]
    fn test_oldest_is_evicted() {
        let mut queue = NoticeQueue::new();
        for i in 0..5 {
            queue.push(format!("n{}", i), NoticeLevel::Default, 1000);
        }
        let messages: Vec<_> = queue.items().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["n2", "n3", "n4"]);
    }

    #[test]
    fn test_ids_are_unique_after_dismiss() {
        let mut queue = NoticeQueue::new();
        let a = queue.success("a");
        queue.dismiss(a);
        let b = queue.success("b");
        assert_ne!(a, b);
    }
}
