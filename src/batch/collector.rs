//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理文件列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - glob 模式匹配（逗号分隔多模式）
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/collect.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{LotError, Result};

use glob::Pattern;
use std::path::PathBuf;
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: Vec::new(),
            recursive: true,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                Pattern::new(s).map_err(|e| {
                    LotError::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件（按路径排序）
    pub fn collect(&self) -> Vec<PathBuf> {
        if self.input.is_file() {
            return vec![self.input.clone()];
        }

        if !self.input.is_dir() {
            return vec![];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| self.matches(name))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件名是否匹配任一模式；未设置模式时全部匹配
    fn matches(&self, filename: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_recursive() {
        let root = TempDir::new().unwrap();
        for node in ["0", "1", "2"] {
            let dir = root.path().join(node);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("detailed.out"), "").unwrap();
            fs::write(dir.join("dftb.out"), "").unwrap();
        }

        let files = FileCollector::new(root.path().to_path_buf())
            .with_pattern("detailed.out")
            .unwrap()
            .collect();
        assert_eq!(files.len(), 3);
        assert!(files[0].ends_with("0/detailed.out"));

        let shallow = FileCollector::new(root.path().to_path_buf())
            .with_pattern("detailed.out")
            .unwrap()
            .recursive(false)
            .collect();
        assert!(shallow.is_empty());
    }

    #[test]
    fn test_multiple_patterns() {
        let collector = FileCollector::new(PathBuf::from("."))
            .with_pattern("detailed*.out, *.en")
            .unwrap();
        assert!(collector.matches("detailed.out"));
        assert!(collector.matches("detailed_3.out"));
        assert!(collector.matches("result_qmcfc.en"));
        assert!(!collector.matches("dftb.out"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            FileCollector::new(PathBuf::from(".")).with_pattern("[detailed"),
            Err(LotError::InvalidArgument(_))
        ));
    }
}
