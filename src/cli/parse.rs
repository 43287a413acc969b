//! # parse 子命令 CLI 定义
//!
//! 离线解析已有的 DFTB+/QMCFC 输出文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/parse.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// parse 主命令参数
#[derive(Args, Debug)]
pub struct ParseArgs {
    #[command(subcommand)]
    pub command: ParseCommands,
}

/// parse 子命令
#[derive(Subcommand, Debug)]
pub enum ParseCommands {
    /// Parse a DFTB+ detailed.out file
    Dftb(DftbParseArgs),

    /// Parse QMCFC info, energy and force files
    Qmcfc(QmcfcParseArgs),
}

/// 原子数来源：直接给出或从几何文件读取
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct AtomCount {
    /// Number of atoms
    #[arg(short, long)]
    pub natoms: Option<usize>,

    /// Geometry file (XYZ) used to determine the atom count
    #[arg(short, long)]
    pub geometry: Option<PathBuf>,
}

/// DFTB+ 解析参数
#[derive(Args, Debug)]
pub struct DftbParseArgs {
    /// Path to detailed.out
    #[arg(default_value = "detailed.out")]
    pub detailed: PathBuf,

    #[command(flatten)]
    pub atoms: AtomCount,

    /// Write the gradient to a CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}

/// QMCFC 解析参数
#[derive(Args, Debug)]
pub struct QmcfcParseArgs {
    /// Info file describing the energy file columns
    #[arg(long)]
    pub info: PathBuf,

    /// Energy file (kcal/mol)
    #[arg(long)]
    pub energy: PathBuf,

    /// Force file (kcal/mol/Å)
    #[arg(long)]
    pub forces: PathBuf,

    #[command(flatten)]
    pub atoms: AtomCount,

    /// Write the gradient to a CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}
