//! 选择器与目录
//!
//! - 模板目录减去用户已实例化的模板（按 `from` 匹配）
//! - 图标目录的解析、搜索，以及虚拟列表的可视窗口计算

use serde::Deserialize;

use crate::badge::title_to_slug;
use crate::error::{SoupError, SoupResult};
use crate::{CreatedDefaultProfile, Document, ProfileTemplate};

// =========================================================
// 模板选择器
// =========================================================

/// 用户尚未实例化的模板，保持目录原有顺序
pub fn available_templates(
    templates: &[Document<ProfileTemplate>],
    existing: &[Document<CreatedDefaultProfile>],
) -> Vec<Document<ProfileTemplate>> {
    templates
        .iter()
        .filter(|t| !existing.iter().any(|p| p.data.from == t.id))
        .cloned()
        .collect()
}

pub fn find_template<'a>(
    templates: &'a [Document<ProfileTemplate>],
    name: &str,
) -> Option<&'a Document<ProfileTemplate>> {
    templates.iter().find(|t| t.data.name == name)
}

// =========================================================
// 图标目录
// =========================================================

/// 图标下拉项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconOption {
    /// simple-icons slug
    pub value: String,
    /// 显示名
    pub label: String,
    /// 预览图地址（CDN 上的 `<slug>.svg`，以 `<img>` 加载而非内联）
    pub svg_url: String,
}

#[derive(Deserialize)]
struct IconEntry {
    title: String,
    #[serde(default)]
    slug: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IconCatalogFile {
    Wrapped { icons: Vec<IconEntry> },
    Bare(Vec<IconEntry>),
}

/// 解析 simple-icons 的数据文件（新版是裸数组，旧版包在 `icons` 字段里）
pub fn parse_icon_catalog(json: &str, cdn: &str) -> SoupResult<Vec<IconOption>> {
    let file: IconCatalogFile = serde_json::from_str(json)
        .map_err(|e| SoupError::from(e).in_op("catalog.parse_icons"))?;

    let entries = match file {
        IconCatalogFile::Wrapped { icons } => icons,
        IconCatalogFile::Bare(icons) => icons,
    };

    let cdn = cdn.trim_end_matches('/');
    Ok(entries
        .into_iter()
        .map(|entry| {
            let value = entry
                .slug
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| title_to_slug(&entry.title));
            IconOption {
                svg_url: format!("{}/{}.svg", cdn, value),
                value,
                label: entry.title,
            }
        })
        .collect())
}

/// 按显示名做大小写不敏感的子串搜索
pub fn filter_icons<'a>(options: &'a [IconOption], query: &str) -> Vec<&'a IconOption> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return options.iter().collect();
    }
    options
        .iter()
        .filter(|o| o.label.to_lowercase().contains(&needle))
        .collect()
}

// =========================================================
// 虚拟列表
// =========================================================

/// 固定行高列表的可视窗口
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualWindow {
    /// 首个渲染项（含）
    pub start: usize,
    /// 末个渲染项（不含）
    pub end: usize,
    /// 首个渲染项距列表顶部的偏移
    pub offset_top: f64,
    /// 整个列表的高度
    pub total_height: f64,
}

impl VirtualWindow {
    pub fn compute(
        scroll_top: f64,
        viewport: f64,
        item_height: f64,
        count: usize,
        overscan: usize,
    ) -> Self {
        let total_height = item_height * count as f64;
        if count == 0 || item_height <= 0.0 {
            return Self {
                start: 0,
                end: 0,
                offset_top: 0.0,
                total_height: total_height.max(0.0),
            };
        }

        let scroll_top = scroll_top.clamp(0.0, total_height);
        let first_visible = (scroll_top / item_height).floor() as usize;
        let last_visible = ((scroll_top + viewport.max(0.0)) / item_height).ceil() as usize;

        let start = first_visible.saturating_sub(overscan).min(count);
        let end = (last_visible + overscan).min(count);

        Self {
            start,
            end,
            offset_top: start as f64 * item_height,
            total_height,
        }
    }
}

/// 打开列表时让已选项位于顶部
pub fn initial_scroll_offset(selected_index: Option<usize>, item_height: f64) -> f64 {
    selected_index.map(|i| i as f64 * item_height).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, name: &str) -> Document<ProfileTemplate> {
        Document::new(
            id,
            ProfileTemplate {
                name: name.into(),
                color: "#000000".into(),
                icon: name.into(),
                base_url: format!("https://{}.com/__username__", name.to_lowercase()),
            },
        )
    }

    fn created(from: &str) -> Document<CreatedDefaultProfile> {
        Document::new(
            format!("c-{}", from),
            CreatedDefaultProfile {
                from: from.into(),
                name: "x".into(),
                color: "#000000".into(),
                icon: String::new(),
                link: "https://x".into(),
            },
        )
    }

    #[test]
    fn test_available_excludes_instantiated() {
        let templates = vec![template("gh", "GitHub"), template("tw", "Twitter")];
        let available = available_templates(&templates, &[created("gh")]);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, "tw");

        let none_left = available_templates(&templates, &[created("gh"), created("tw")]);
        assert!(none_left.is_empty());
    }

    #[test]
    fn test_find_template_by_name() {
        let templates = vec![template("gh", "GitHub")];
        assert_eq!(find_template(&templates, "GitHub").map(|t| t.id.as_str()), Some("gh"));
        assert!(find_template(&templates, "github").is_none());
    }

    #[test]
    fn test_parse_icon_catalog_both_shapes() {
        let wrapped = r#"{"icons":[{"title":"GitHub","hex":"181717"},{"title":"Dev.to","slug":"devdotto"}]}"#;
        let icons = parse_icon_catalog(wrapped, "https://cdn.example/icons/").unwrap();
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[0].value, "github");
        assert_eq!(icons[0].svg_url, "https://cdn.example/icons/github.svg");
        assert_eq!(icons[1].value, "devdotto");
        assert_eq!(icons[1].label, "Dev.to");

        let bare = r#"[{"title":"Stack Overflow"}]"#;
        let icons = parse_icon_catalog(bare, "https://cdn.example/icons").unwrap();
        assert_eq!(icons[0].value, "stackoverflow");
    }

    #[test]
    fn test_parse_icon_catalog_derives_slug_from_title() {
        let json = r##"[{"title":"Node.js"},{"title":"C++"},{"title":"C#"},{"title":"Dev.to"}]"##;
        let icons = parse_icon_catalog(json, "https://cdn.example/icons").unwrap();
        let values: Vec<&str> = icons.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["nodedotjs", "cplusplus", "csharp", "devdotto"]);
        assert_eq!(icons[0].svg_url, "https://cdn.example/icons/nodedotjs.svg");
        assert_eq!(icons[2].svg_url, "https://cdn.example/icons/csharp.svg");
        assert!(icons.iter().all(|o| !o.svg_url.contains('#') && !o.svg_url.contains('+')));
        assert_eq!(icons[1].label, "C++");
    }

    #[test]
    fn test_parse_icon_catalog_rejects_garbage() {
        let err = parse_icon_catalog("{\"nope\": 1}", "x").unwrap_err();
        assert_eq!(err.status, crate::SoupErrorStatus::Serialization);
    }

    #[test]
    fn test_filter_icons() {
        let icons = parse_icon_catalog(r#"[{"title":"GitHub"},{"title":"GitLab"},{"title":"Twitch"}]"#, "c").unwrap();
        assert_eq!(filter_icons(&icons, "GIT").len(), 2);
        assert_eq!(filter_icons(&icons, "  ").len(), 3);
        assert!(filter_icons(&icons, "zzz").is_empty());
    }

    #[test]
    fn test_virtual_window() {
        let w = VirtualWindow::compute(0.0, 300.0, 50.0, 1000, 2);
        assert_eq!((w.start, w.end), (0, 8));
        assert_eq!(w.total_height, 50_000.0);

        let w = VirtualWindow::compute(1000.0, 300.0, 50.0, 1000, 2);
        assert_eq!((w.start, w.end), (18, 28));
        assert_eq!(w.offset_top, 900.0);

        let w = VirtualWindow::compute(49_900.0, 300.0, 50.0, 1000, 2);
        assert_eq!(w.end, 1000);

        let empty = VirtualWindow::compute(10.0, 300.0, 50.0, 0, 2);
        assert_eq!((empty.start, empty.end), (0, 0));
    }

    #[test]
    fn test_initial_scroll_offset() {
        assert_eq!(initial_scroll_offset(Some(4), 50.0), 200.0);
        assert_eq!(initial_scroll_offset(None, 50.0), 0.0);
    }
}
