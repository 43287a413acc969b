//! # qmlot 命令行入口
//!
//! ## 子命令
//! - `run` - 调用外部程序计算
//!   - `dftb` - DFTB+
//!   - `qmcfc` - QMCFC
//! - `parse` - 离线解析已有输出
//! - `collect` - 批量收集 DFTB+ 结果
//!
//! ## 依赖关系
//! - 使用库中的 `cli/`, `commands/`, `utils/output.rs`

use clap::Parser;
use qmlot::cli::Cli;
use qmlot::{commands, utils};

fn main() {
    pretty_env_logger::init();

    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        log::debug!("{:?}", e);
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
