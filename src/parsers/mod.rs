//! # 解析器模块
//!
//! 提供几何文件的读写，以及外部量子化学程序输出的解析。
//!
//! ## 依赖关系
//! - 被 `lot/` 和 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: pattern, dftb, qmcfc, xyz, gen_format

pub mod dftb;
pub mod gen_format;
pub mod pattern;
pub mod qmcfc;
pub mod xyz;
