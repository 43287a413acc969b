//! # 行模式匹配器
//!
//! 表驱动的逐行正则匹配，每个模式带名字，捕获组使用命名分组。
//! 各输出解析器把自己的标记和数据行格式登记在一张静态表中，
//! 便于单独审查和测试。
//!
//! ## 依赖关系
//! - 被 `parsers/dftb.rs` 使用
//! - 使用 `regex` crate

use crate::error::{LotError, Result};
use regex::{Captures, Regex};

/// 通用浮点数模式：1.23, -0.032, 1.2e-4, .123, 12, 1.0D-03
pub const FLOAT: &str = r"[-+]?(?:\d+\.\d*|\.\d+|\d+)(?:[eEdD][-+]?\d+)?";

/// 命名的行模式
#[derive(Debug)]
pub struct LinePattern {
    pub name: &'static str,
    pub regex: Regex,
}

/// 模式表
#[derive(Debug)]
pub struct PatternTable {
    patterns: Vec<LinePattern>,
}

/// 一次行匹配结果
#[derive(Debug)]
pub struct LineMatch<'t> {
    /// 行号（从 1 开始）
    pub line_no: usize,
    /// 原始行内容
    pub line: &'t str,
    captures: Captures<'t>,
}

impl<'t> LineMatch<'t> {
    /// 取命名捕获组文本
    pub fn get(&self, group: &str) -> Option<&'t str> {
        self.captures.name(group).map(|m| m.as_str())
    }

    /// 将命名捕获组解析为 f64，失败时带上来源与行号
    pub fn float(&self, group: &str, source: &str) -> Result<f64> {
        let text = self.get(group).ok_or_else(|| LotError::MalformedRow {
            path: source.to_string(),
            line: self.line_no,
            reason: format!("missing capture group '{}'", group),
        })?;
        parse_float(text).ok_or_else(|| LotError::MalformedRow {
            path: source.to_string(),
            line: self.line_no,
            reason: format!("'{}' is not a number", text),
        })
    }
}

impl PatternTable {
    /// 由 (名字, 正则) 行构建模式表
    pub fn new(rows: &[(&'static str, &str)]) -> std::result::Result<Self, regex::Error> {
        let patterns = rows
            .iter()
            .map(|&(name, re)| {
                Ok(LinePattern {
                    name,
                    regex: Regex::new(re)?,
                })
            })
            .collect::<std::result::Result<Vec<_>, regex::Error>>()?;
        Ok(PatternTable { patterns })
    }

    /// 按名字查找模式
    pub fn pattern(&self, name: &str) -> Option<&Regex> {
        self.patterns
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.regex)
    }

    /// 已登记的模式名
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.patterns.iter().map(|p| p.name)
    }

    /// 单行匹配
    pub fn match_line<'t>(&self, name: &str, line: &'t str, line_no: usize) -> Option<LineMatch<'t>> {
        let regex = self.pattern(name)?;
        regex.captures(line).map(|captures| LineMatch {
            line_no,
            line,
            captures,
        })
    }

    /// 所有匹配行
    pub fn find_all<'t>(&self, name: &str, text: &'t str) -> Vec<LineMatch<'t>> {
        text.lines()
            .enumerate()
            .filter_map(|(i, line)| self.match_line(name, line, i + 1))
            .collect()
    }

    /// 第一处匹配
    pub fn find_first<'t>(&self, name: &str, text: &'t str) -> Option<LineMatch<'t>> {
        text.lines()
            .enumerate()
            .find_map(|(i, line)| self.match_line(name, line, i + 1))
    }

    /// 最后一处匹配
    pub fn find_last<'t>(&self, name: &str, text: &'t str) -> Option<LineMatch<'t>> {
        self.find_all(name, text).pop()
    }
}

/// 解析浮点数，兼容 Fortran 的 D 指数
pub fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .or_else(|| text.replace(['D', 'd'], "E").parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        PatternTable::new(&[
            ("energy", format!(r"Energy\s*=\s*(?P<value>{})", FLOAT).as_str()),
            ("marker", r"^\s*BEGIN\s*$"),
        ])
        .unwrap()
    }

    #[test]
    fn test_find_first_and_last() {
        let text = "header\nEnergy = -1.5\nfoo\nEnergy = -2.25\n";
        let t = table();

        let first = t.find_first("energy", text).unwrap();
        assert_eq!(first.line_no, 2);
        assert_eq!(first.float("value", "test").unwrap(), -1.5);

        let last = t.find_last("energy", text).unwrap();
        assert_eq!(last.line_no, 4);
        assert_eq!(last.float("value", "test").unwrap(), -2.25);
    }

    #[test]
    fn test_unknown_pattern_never_matches() {
        let t = table();
        assert!(t.find_first("missing", "Energy = 1.0").is_none());
        assert_eq!(t.names().collect::<Vec<_>>(), vec!["energy", "marker"]);
    }

    #[test]
    fn test_parse_float_variants() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float("-.5"), Some(-0.5));
        assert_eq!(parse_float("1.0D-03"), Some(1.0e-3));
        assert_eq!(parse_float("2.5e2"), Some(250.0));
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn test_missing_group_is_malformed_row() {
        let t = table();
        let m = t.find_first("marker", "  BEGIN  ").unwrap();
        assert!(matches!(
            m.float("value", "test"),
            Err(LotError::MalformedRow { line: 1, .. })
        ));
    }
}
