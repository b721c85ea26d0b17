//! Profile 创建服务
//!
//! 负责把表单数据变成要写入的文档，并通过 `SubmissionGuard`
//! 保证同一模板在一次会话中只会被提交一次。

use std::collections::HashSet;
use std::sync::Mutex;

use crate::catalog::IconOption;
use crate::error::{SoupError, SoupResult};
use crate::link::LinkPattern;
use crate::store::{CollectionPath, DocumentStore};
use crate::validation::{FormSchema, FormValues, custom_profile_schema};
use crate::{
    BadgeData, CreatedDefaultProfile, CustomProfile, DEFAULT_CUSTOM_COLOR, Document, ProfileTemplate,
};

#[cfg(test)]
mod tests;

// =========================================================
// 防重复提交
// =========================================================

/// 已提交（或提交中）的模板 ID 集合
#[derive(Debug, Default)]
pub struct SubmissionGuard {
    submitted: Mutex<HashSet<String>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_set<R>(&self, f: impl FnOnce(&mut HashSet<String>) -> R) -> R {
        // 单线程环境下不会出现中毒，出现时沿用内部数据
        let mut set = self
            .submitted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut set)
    }

    /// 返回 false 表示该模板已被占用
    pub fn try_acquire(&self, template_id: &str) -> bool {
        self.with_set(|set| set.insert(template_id.to_string()))
    }

    pub fn release(&self, template_id: &str) {
        self.with_set(|set| {
            set.remove(template_id);
        });
    }

    pub fn contains(&self, template_id: &str) -> bool {
        self.with_set(|set| set.contains(template_id))
    }
}

// =========================================================
// 表单模型
// =========================================================

/// 自定义 Profile 表单的当前值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomProfileForm {
    pub name: String,
    pub link: String,
    pub color: String,
    pub icon: Option<IconOption>,
}

impl Default for CustomProfileForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            link: String::new(),
            color: DEFAULT_CUSTOM_COLOR.to_string(),
            icon: None,
        }
    }
}

impl CustomProfileForm {
    pub fn values(&self) -> FormValues {
        FormValues::from([
            ("name".to_string(), self.name.clone()),
            ("link".to_string(), self.link.clone()),
            ("color".to_string(), self.color.clone()),
        ])
    }

    /// 图标只保留显示名，未选择时为 null
    pub fn to_profile(&self) -> CustomProfile {
        CustomProfile {
            name: self.name.clone(),
            color: self.color.clone(),
            icon: self.icon.as_ref().map(|o| o.label.clone()),
            link: self.link.clone(),
        }
    }

    /// 实时预览：图标直接取已选项的 slug
    pub fn preview(&self) -> BadgeData {
        BadgeData {
            name: self.name.clone(),
            color: self.color.clone(),
            icon: self.icon.as_ref().map(|o| o.value.clone()),
            link: Some(self.link.clone()).filter(|l| !l.is_empty()),
        }
    }
}

/// 由模板与占位符取值构建要写入的文档：去掉 `baseURL` 与 `id`，附加 `from`
pub fn build_default_profile(
    template: &Document<ProfileTemplate>,
    values: &FormValues,
) -> SoupResult<CreatedDefaultProfile> {
    let pattern = LinkPattern::parse(&template.data.base_url);
    let schema = FormSchema::for_tokens(&pattern.tokens());

    if !schema.is_valid(values) {
        return Err(SoupError::invalid_input(format!(
            "Missing details for '{}'",
            template.data.name
        ))
        .in_op("profile.build_default"));
    }

    let link = pattern
        .fill(values)
        .map_err(|e| e.in_op("profile.build_default"))?;

    Ok(CreatedDefaultProfile {
        from: template.id.clone(),
        name: template.data.name.clone(),
        color: template.data.color.clone(),
        icon: template.data.icon.clone(),
        link,
    })
}

// =========================================================
// 服务
// =========================================================

pub struct ProfileService<S> {
    store: S,
    guard: SubmissionGuard,
}

impl<S: DocumentStore> ProfileService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            guard: SubmissionGuard::new(),
        }
    }

    pub fn is_submitted(&self, template_id: &str) -> bool {
        self.guard.contains(template_id)
    }

    /// 显式回滚防重复标记，允许失败后重试
    pub fn release(&self, template_id: &str) {
        self.guard.release(template_id);
    }

    /// 实例化模板并写入 `users/<uid>/defaultProfiles`
    ///
    /// 校验失败不会占用防重复标记；写入失败时标记保持不变，
    /// 是否回滚由调用方通过 [`ProfileService::release`] 决定。
    pub async fn create_default_profile(
        &self,
        uid: &str,
        template: &Document<ProfileTemplate>,
        values: &FormValues,
    ) -> SoupResult<CreatedDefaultProfile> {
        let profile = build_default_profile(template, values)?;

        if !self.guard.try_acquire(&template.id) {
            return Err(SoupError::conflict(format!(
                "'{}' has already been submitted",
                template.data.name
            ))
            .in_op_with("profile.create_default", template.id.clone()));
        }

        let path = CollectionPath::user_default_profiles(uid);
        let document = serde_json::to_value(&profile)?;
        self.store
            .append(&path, document)
            .await
            .map_err(|e| e.in_op_with("profile.create_default", template.id.clone()))?;

        Ok(profile)
    }

    /// 校验并写入 `users/<uid>/customProfiles`
    pub async fn create_custom_profile(
        &self,
        uid: &str,
        form: &CustomProfileForm,
    ) -> SoupResult<CustomProfile> {
        let errors = custom_profile_schema().validate(&form.values());
        if let Some(err) = errors.values().flatten().next() {
            return Err(SoupError::invalid_input(err.message()).in_op("profile.create_custom"));
        }

        let profile = form.to_profile();
        let path = CollectionPath::user_custom_profiles(uid);
        let document = serde_json::to_value(&profile)?;
        self.store
            .append(&path, document)
            .await
            .map_err(|e| e.in_op_with("profile.create_custom", uid.to_string()))?;

        Ok(profile)
    }
}
