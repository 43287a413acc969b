//! # 运行时资源模块
//!
//! 外部程序调用接口与计算工作目录。
//!
//! ## 依赖关系
//! - 被 `lot/` 使用
//! - 子模块: process, scratch

pub mod process;
pub mod scratch;

pub use process::{ProcessOutput, ProcessRunner, SystemRunner};
pub use scratch::ScratchDir;
