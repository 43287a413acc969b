//! # 工具函数模块
//!
//! 提供美化输出、进度条与结果导出等工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch/` 模块使用
//! - 子模块: output, progress, export

pub mod export;
pub mod output;
pub mod progress;
