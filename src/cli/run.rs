//! # run 子命令 CLI 定义
//!
//! 对一个 XYZ 几何调用外部程序计算能量与梯度
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// run 主命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(subcommand)]
    pub command: RunCommands,
}

/// run 子命令
#[derive(Subcommand, Debug)]
pub enum RunCommands {
    /// Run DFTB+ (reads detailed.out)
    Dftb(DftbRunArgs),

    /// Run QMCFC (reads the declared info/energy/force files)
    Qmcfc(QmcfcRunArgs),
}

/// 各程序共用的参数
#[derive(Args, Debug)]
pub struct CommonRunArgs {
    /// Geometry file in XYZ format (Å)
    #[arg(short, long)]
    pub geometry: PathBuf,

    /// Spin multiplicity of the requested state
    #[arg(long, default_value_t = 1)]
    pub multiplicity: u32,

    /// State index within the multiplicity (0 = lowest)
    #[arg(long, default_value_t = 0)]
    pub state: usize,

    /// Root directory for per-node scratch directories
    #[arg(long, env = "QMLOT_SCRATCH", default_value = "scratch")]
    pub scratch: PathBuf,

    /// Node id; the scratch directory is <scratch>/<node-id>
    #[arg(long, default_value_t = 0)]
    pub node_id: usize,

    /// Keep the scratch directory after the run
    #[arg(long, default_value_t = false)]
    pub keep_scratch: bool,

    /// Write the gradient to a CSV file
    #[arg(long)]
    pub output_csv: Option<PathBuf>,
}

/// DFTB+ 参数
#[derive(Args, Debug)]
pub struct DftbRunArgs {
    #[command(flatten)]
    pub common: CommonRunArgs,

    /// DFTB+ input template (.hsd), staged as dftb_in.hsd
    #[arg(short, long, default_value = "dftb_in.hsd")]
    pub input: PathBuf,

    /// Lattice vectors file (three lines, Å); makes the run periodic
    #[arg(long)]
    pub lattice: Option<PathBuf>,

    /// DFTB+ executable
    #[arg(long, env = "DFTB_EXEC", default_value = "dftb+")]
    pub exec: String,
}

/// QMCFC 参数
#[derive(Args, Debug)]
pub struct QmcfcRunArgs {
    #[command(flatten)]
    pub common: CommonRunArgs,

    /// QMCFC input file (run-xx.in / md-xx.in) declaring info_file, energy_file, force_file
    #[arg(short, long)]
    pub input: PathBuf,

    /// QMCFC executable
    #[arg(long, env = "QMCFC_EXEC")]
    pub exec: String,
}
