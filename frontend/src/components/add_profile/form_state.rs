//! 表单状态管理模块
//!
//! 将零散的 signal 整合为结构体，负责：
//! - 数据的持有与重置
//! - 校验结果（提交过一次后才展示）
//! - 转换为写入用的表单模型与预览徽章

use leptos::prelude::*;
use profile_soup_shared::catalog::IconOption;
use profile_soup_shared::profile::CustomProfileForm;
use profile_soup_shared::validation::{FormSchema, FormValues, custom_profile_schema};
use profile_soup_shared::{BadgeData, DEFAULT_CUSTOM_COLOR};

/// 自定义 Profile 表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct CustomFormState {
    pub name: RwSignal<String>,
    pub link: RwSignal<String>,
    pub color: RwSignal<String>,
    pub icon: RwSignal<Option<IconOption>>,
    pub submitted: RwSignal<bool>,
    pub loading: RwSignal<bool>,
}

impl CustomFormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            link: RwSignal::new(String::new()),
            color: RwSignal::new(DEFAULT_CUSTOM_COLOR.to_string()),
            icon: RwSignal::new(None),
            submitted: RwSignal::new(false),
            loading: RwSignal::new(false),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.name.set(String::new());
        self.link.set(String::new());
        self.color.set(DEFAULT_CUSTOM_COLOR.to_string());
        self.icon.set(None);
        self.submitted.set(false);
    }

    /// 当前值（响应式）
    pub fn to_form(&self) -> CustomProfileForm {
        CustomProfileForm {
            name: self.name.get(),
            link: self.link.get(),
            color: self.color.get(),
            icon: self.icon.get(),
        }
    }

    /// 字段错误；未提交过时一律为 None
    pub fn error(&self, field: &'static str) -> Signal<Option<String>> {
        let state = *self;
        Signal::derive(move || {
            if !state.submitted.get() {
                return None;
            }
            let errors = custom_profile_schema().validate(&state.to_form().values());
            errors
                .get(field)
                .and_then(|e| e.as_ref())
                .map(|e| e.message().to_string())
        })
    }

    pub fn preview(&self) -> Signal<BadgeData> {
        let state = *self;
        Signal::derive(move || state.to_form().preview())
    }
}

/// 模板占位符表单状态
#[derive(Clone, Copy)]
pub struct TokenFormState {
    pub values: RwSignal<FormValues>,
    pub submitted: RwSignal<bool>,
    pub loading: RwSignal<bool>,
}

impl TokenFormState {
    pub fn new(tokens: &[String]) -> Self {
        let values = tokens
            .iter()
            .map(|t| (t.clone(), String::new()))
            .collect::<FormValues>();
        Self {
            values: RwSignal::new(values),
            submitted: RwSignal::new(false),
            loading: RwSignal::new(false),
        }
    }

    pub fn reset(&self) {
        self.values.update(|v| v.values_mut().for_each(String::clear));
        self.submitted.set(false);
    }

    pub fn value(&self, token: String) -> Signal<String> {
        let values = self.values;
        Signal::derive(move || values.with(|v| v.get(&token).cloned().unwrap_or_default()))
    }

    pub fn setter(&self, token: String) -> Callback<String> {
        let values = self.values;
        Callback::new(move |value: String| {
            values.update(|v| {
                v.insert(token.clone(), value);
            });
        })
    }

    pub fn error(&self, schema: FormSchema, token: String) -> Signal<Option<String>> {
        let state = *self;
        Signal::derive(move || {
            if !state.submitted.get() {
                return None;
            }
            state.values.with(|v| {
                schema
                    .validate(v)
                    .remove(&token)
                    .flatten()
                    .map(|e| e.message().to_string())
            })
        })
    }
}
