//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `run`: 调用外部程序完成一步计算（嵌套子命令）
//!   - `dftb`: DFTB+
//!   - `qmcfc`: QMCFC
//! - `parse`: 离线解析已有输出文件（嵌套子命令）
//! - `collect`: 批量收集多个工作目录中的 DFTB+ 结果
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: run, parse, collect

pub mod collect;
pub mod parse;
pub mod run;

use clap::{Parser, Subcommand};

/// qmlot - 外部量子化学程序的能量/梯度适配层
#[derive(Parser)]
#[command(name = "qmlot")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Energy/gradient adapters for external quantum chemistry codes (DFTB+, QMCFC)",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Run one energy/gradient calculation with an external program
    Run(run::RunArgs),

    /// Parse existing output files into energy and gradient
    Parse(parse::ParseArgs),

    /// Collect DFTB+ results from many scratch directories
    Collect(collect::CollectArgs),
}
