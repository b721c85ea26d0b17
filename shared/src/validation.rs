//! 表单校验
//!
//! 用类型化的 schema（字段名 -> 是否必填 / 最小长度）替代运行时的字段注册，
//! 由通用校验器得到 "字段名 -> 错误或无" 的映射。

use std::collections::BTreeMap;

/// 表单的当前取值
pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required { message: String },
    TooShort { min: usize, message: String },
}

impl FieldError {
    pub fn message(&self) -> &str {
        match self {
            FieldError::Required { message } | FieldError::TooShort { message, .. } => message,
        }
    }
}

/// 单个字段的规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub required: bool,
    pub min_len: usize,
}

impl FieldRule {
    pub fn required(name: impl Into<String>, min_len: usize) -> Self {
        Self {
            name: name.into(),
            required: true,
            min_len,
        }
    }

    pub fn label(&self) -> String {
        field_label(&self.name)
    }

    pub fn check(&self, value: &str) -> Option<FieldError> {
        if value.is_empty() {
            if self.required {
                return Some(FieldError::Required {
                    message: format!("{} is required", self.label()),
                });
            }
            return None;
        }

        if value.chars().count() < self.min_len {
            return Some(FieldError::TooShort {
                min: self.min_len,
                message: format!(
                    "{} must be at least {} characters",
                    self.label(),
                    self.min_len
                ),
            });
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    pub rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// 链接模板占位符：每个都必填，至少 2 个字符
    pub fn for_tokens(tokens: &[String]) -> Self {
        Self::new(
            tokens
                .iter()
                .map(|t| FieldRule::required(t.clone(), 2))
                .collect(),
        )
    }

    pub fn validate(&self, values: &FormValues) -> BTreeMap<String, Option<FieldError>> {
        self.rules
            .iter()
            .map(|rule| {
                let value = values.get(&rule.name).map(String::as_str).unwrap_or("");
                (rule.name.clone(), rule.check(value))
            })
            .collect()
    }

    pub fn is_valid(&self, values: &FormValues) -> bool {
        self.validate(values).values().all(Option::is_none)
    }
}

/// 自定义 Profile 表单：name ≥ 2，link ≥ 6，color 必填
pub fn custom_profile_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldRule::required("name", 2),
        FieldRule::required("link", 6),
        FieldRule::required("color", 0),
    ])
}

/// 显示用标签：首字母大写
pub fn field_label(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
