//! 徽章渲染
//!
//! 纯函数：由 {name, color, icon, link} 组装外部徽章图片服务的请求地址。

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use url::form_urlencoded;

use crate::BadgeData;

pub const DEFAULT_BADGE_ENDPOINT: &str = "https://img.shields.io/static/v1";
pub const DEFAULT_BADGE_STYLE: &str = "for-the-badge";

/// 徽章图片服务配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeStyle {
    pub endpoint: String,
    pub style: String,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BADGE_ENDPOINT.to_string(),
            style: DEFAULT_BADGE_STYLE.to_string(),
        }
    }
}

/// 渲染结果：图片地址，以及可选的外链
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeImage {
    pub src: String,
    pub alt: String,
    pub href: Option<String>,
}

/// 新窗口打开外链时使用的 rel
pub const LINK_REL: &str = "noopener noreferrer";
pub const LINK_TARGET: &str = "_blank";

/// 图标显示名转 simple-icons slug
///
/// 规则与 simple-icons 的 titleToSlug 一致：符号替换为单词，
/// 去掉变音符号，最后只保留 `[a-z0-9]`。对已是 slug 的输入幂等。
pub fn title_to_slug(title: &str) -> String {
    let mut replaced = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        match c {
            '+' => replaced.push_str("plus"),
            '.' => replaced.push_str("dot"),
            '&' => replaced.push_str("and"),
            '#' => replaced.push_str("sharp"),
            'đ' => replaced.push('d'),
            'ħ' => replaced.push('h'),
            'ı' => replaced.push('i'),
            'ĸ' => replaced.push('k'),
            'ŀ' | 'ł' => replaced.push('l'),
            'ß' => replaced.push_str("ss"),
            'ŧ' => replaced.push('t'),
            'ø' => replaced.push('o'),
            _ => replaced.push(c),
        }
    }
    replaced
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// name 为空时不渲染
pub fn badge_image(data: &BadgeData, style: &BadgeStyle) -> Option<BadgeImage> {
    if data.name.is_empty() {
        return None;
    }

    let color = data.color.strip_prefix('#').unwrap_or(&data.color);

    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("label", "")
        .append_pair("message", &data.name)
        .append_pair("color", color)
        .append_pair("style", &style.style);

    if let Some(icon) = data.icon.as_deref() {
        let slug = title_to_slug(icon);
        if !slug.is_empty() {
            query.append_pair("logo", &slug);
        }
    }

    Some(BadgeImage {
        src: format!("{}?{}", style.endpoint, query.finish()),
        alt: data.name.clone(),
        href: data.link.clone().filter(|l| !l.is_empty()),
    })
}
