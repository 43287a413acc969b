//! # collect 子命令 CLI 定义
//!
//! 扫描工作目录，批量解析 DFTB+ detailed.out 并按能量排序
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/collect.rs`

use clap::Args;
use std::path::PathBuf;

/// collect 子命令参数
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Root directory containing scratch directories
    pub root: PathBuf,

    /// Number of atoms in every calculation
    #[arg(short, long)]
    pub natoms: usize,

    /// Glob pattern for output files (comma-separated for several)
    #[arg(short, long, default_value = "detailed.out")]
    pub pattern: String,

    /// Only look at files directly inside the root directory
    #[arg(long, default_value_t = false)]
    pub no_recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Number of lowest-energy results to print
    #[arg(long, default_value_t = 10)]
    pub top_n: usize,

    /// CSV file for all collected energies
    #[arg(short, long, default_value = "collected_energies.csv")]
    pub output: PathBuf,
}
