use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
/// 标识错误的语义类别，决定了 UI 如何呈现
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoupErrorStatus {
    /// 表单或链接模板校验失败
    InvalidInput,
    /// 文档存储读写失败 (网络、权限、后端错误)
    Store,
    /// 身份提供方返回的登录错误
    Auth,
    /// JSON / JsValue 转换失败
    Serialization,
    /// 重复提交 (同一模板已在提交中或已提交)
    Conflict,
    /// 引用的资源不存在
    NotFound,
}

impl SoupErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            SoupErrorStatus::InvalidInput => "INVALID_INPUT",
            SoupErrorStatus::Store => "STORE_ERROR",
            SoupErrorStatus::Auth => "AUTH_ERROR",
            SoupErrorStatus::Serialization => "SERIALIZATION_ERROR",
            SoupErrorStatus::Conflict => "DUPLICATE_SUBMISSION",
            SoupErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "store.append", "profile.create_default"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 应用领域错误
///
/// - status: 错误类型
/// - message: 面向用户的错误消息
/// - source: 原始错误（可选）
/// - spans: 调用追踪栈
#[derive(Debug)]
pub struct SoupError {
    pub status: SoupErrorStatus,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl SoupError {
    pub fn new(status: SoupErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(SoupErrorStatus::InvalidInput, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(SoupErrorStatus::Store, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(SoupErrorStatus::Auth, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(SoupErrorStatus::Serialization, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(SoupErrorStatus::Conflict, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(SoupErrorStatus::NotFound, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

impl fmt::Display for SoupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for SoupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for SoupError {
    fn from(e: serde_json::Error) -> Self {
        SoupError::serialization(e.to_string()).with_source(e)
    }
}

pub type SoupResult<T> = std::result::Result<T, SoupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_trace() {
        let err = SoupError::store("permission denied")
            .in_op("store.append")
            .in_op_with("profile.create_custom", "u1");

        assert_eq!(
            err.to_string(),
            "[STORE_ERROR] permission denied | trace: store.append -> profile.create_custom(u1)"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn test_serde_error_keeps_source() {
        let e = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = SoupError::from(e);
        assert_eq!(err.status, SoupErrorStatus::Serialization);
        assert!(std::error::Error::source(&err).is_some());
    }
}
