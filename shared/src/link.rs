//! 链接模板
//!
//! 模板的 `baseURL` 中可以包含 `__name__` 形式的占位符（名称中不含下划线）。
//! 解析后得到字面量与占位符交替的片段序列，填充时一次性拼接，
//! 因此用户输入中即便出现 `__x__` 也不会被二次替换。

use std::collections::BTreeMap;

use crate::error::{SoupError, SoupResult};

const MARKER: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(String),
}

/// 解析后的链接模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPattern {
    segments: Vec<Segment>,
}

impl LinkPattern {
    pub fn parse(base_url: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = base_url;

        while let Some(start) = rest.find(MARKER) {
            let after_open = &rest[start + MARKER.len()..];
            let name_len = after_open.find('_').unwrap_or(after_open.len());
            let name = &after_open[..name_len];

            if name.is_empty() && after_open.starts_with(MARKER) {
                // `____` 是空名占位符，整体按字面量保留
                let end = start + MARKER.len() * 2;
                literal.push_str(&rest[..end]);
                rest = &rest[end..];
            } else if !name.is_empty() && after_open[name_len..].starts_with(MARKER) {
                literal.push_str(&rest[..start]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Token(name.to_string()));
                rest = &after_open[name_len + MARKER.len()..];
            } else {
                // 不是合法占位符：保留一个字符后继续扫描
                let skip = start + 1;
                literal.push_str(&rest[..skip]);
                rest = &rest[skip..];
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// 去重后的占位符名称，按首次出现顺序
    pub fn tokens(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for segment in &self.segments {
            if let Segment::Token(name) = segment {
                if !seen.contains(name) {
                    seen.push(name.clone());
                }
            }
        }
        seen
    }

    pub fn has_tokens(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Token(_)))
    }

    /// 用提交的值生成最终链接；任一占位符缺值即失败
    pub fn fill(&self, values: &BTreeMap<String, String>) -> SoupResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Token(name) => match values.get(name) {
                    Some(value) if !value.is_empty() => out.push_str(value),
                    _ => {
                        return Err(SoupError::invalid_input(format!(
                            "Missing value for '{}'",
                            name
                        ))
                        .in_op("link.fill"));
                    }
                },
            }
        }
        Ok(out)
    }

    /// 实时预览：缺失的值按空串处理
    pub fn preview(&self, values: &BTreeMap<String, String>) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Token(name) => values.get(name).map(String::as_str).unwrap_or(""),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_tokens_fills_verbatim() {
        let pattern = LinkPattern::parse("https://example.com/me");
        assert!(!pattern.has_tokens());
        assert!(pattern.tokens().is_empty());
        assert_eq!(
            pattern.fill(&BTreeMap::new()).unwrap(),
            "https://example.com/me"
        );
    }

    #[test]
    fn test_single_token() {
        let pattern = LinkPattern::parse("https://github.com/__username__");
        assert_eq!(pattern.tokens(), vec!["username".to_string()]);
        assert_eq!(
            pattern.fill(&values(&[("username", "octocat")])).unwrap(),
            "https://github.com/octocat"
        );
    }

    #[test]
    fn test_repeated_and_multiple_tokens() {
        let pattern = LinkPattern::parse("https://__host__/u/__user__?ref=__user__");
        assert_eq!(
            pattern.tokens(),
            vec!["host".to_string(), "user".to_string()]
        );

        let link = pattern
            .fill(&values(&[("host", "gitlab.com"), ("user", "ada")]))
            .unwrap();
        assert_eq!(link, "https://gitlab.com/u/ada?ref=ada");
        assert!(!link.contains("__"));
    }

    #[test]
    fn test_value_containing_marker_is_not_resubstituted() {
        let pattern = LinkPattern::parse("https://x.dev/__a__/__b__");
        let link = pattern
            .fill(&values(&[("a", "__b__"), ("b", "two")]))
            .unwrap();
        assert_eq!(link, "https://x.dev/__b__/two");
    }

    #[test]
    fn test_missing_value_is_rejected() {
        let pattern = LinkPattern::parse("https://github.com/__username__");
        let err = pattern.fill(&values(&[("username", "")])).unwrap_err();
        assert_eq!(err.status, crate::SoupErrorStatus::InvalidInput);
        assert!(pattern.fill(&BTreeMap::new()).is_err());
    }

    #[test]
    fn test_preview_uses_empty_for_missing() {
        let pattern = LinkPattern::parse("https://twitter.com/__handle__");
        assert_eq!(pattern.preview(&BTreeMap::new()), "https://twitter.com/");
        assert_eq!(
            pattern.preview(&values(&[("handle", "jack")])),
            "https://twitter.com/jack"
        );
    }

    #[test]
    fn test_underscores_that_are_not_tokens_stay_literal() {
        let pattern = LinkPattern::parse("https://a.io/my_page/____/__x_y__");
        assert!(!pattern.has_tokens());
        assert_eq!(
            pattern.fill(&BTreeMap::new()).unwrap(),
            "https://a.io/my_page/____/__x_y__"
        );
    }

    #[test]
    fn test_token_after_stray_underscores() {
        let pattern = LinkPattern::parse("https://a.io/___id__");
        assert_eq!(pattern.tokens(), vec!["id".to_string()]);
        assert_eq!(
            pattern.fill(&values(&[("id", "42")])).unwrap(),
            "https://a.io/_42"
        );
    }
}
