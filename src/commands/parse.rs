//! # parse 命令实现
//!
//! 离线解析 DFTB+/QMCFC 输出文件，输出能量与梯度。
//!
//! ## 依赖关系
//! - 使用 `cli/parse.rs` 定义的参数
//! - 使用 `parsers/dftb.rs`, `parsers/qmcfc.rs`, `parsers/xyz.rs`
//! - 使用 `commands/report.rs`

use crate::cli::parse::{AtomCount, DftbParseArgs, ParseArgs, ParseCommands, QmcfcParseArgs};
use crate::commands::report;
use crate::error::{LotError, Result};
use crate::models::StateKey;
use crate::parsers::{dftb, qmcfc, xyz};
use crate::utils::output;

use std::path::Path;

/// 执行 parse 命令
pub fn execute(args: ParseArgs) -> Result<()> {
    match args.command {
        ParseCommands::Dftb(args) => execute_dftb(args),
        ParseCommands::Qmcfc(args) => execute_qmcfc(args),
    }
}

fn execute_dftb(args: DftbParseArgs) -> Result<()> {
    output::print_header("Parsing DFTB+ Output");
    require_file(&args.detailed)?;

    let (num_atoms, elements) = resolve_atoms(&args.atoms)?;
    let result = dftb::parse_detailed_out_file(&args.detailed, num_atoms)?;

    report::present(
        StateKey::ground(),
        &result,
        &elements,
        args.output_csv.as_deref(),
    )
}

fn execute_qmcfc(args: QmcfcParseArgs) -> Result<()> {
    output::print_header("Parsing QMCFC Output");
    for path in [&args.info, &args.energy, &args.forces] {
        require_file(path)?;
    }

    let (num_atoms, elements) = resolve_atoms(&args.atoms)?;
    let result = qmcfc::parse_output_files(&args.info, &args.energy, &args.forces, num_atoms)?;

    report::present(
        StateKey::ground(),
        &result,
        &elements,
        args.output_csv.as_deref(),
    )
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LotError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}

/// 确定原子数；给出几何文件时同时返回元素列表
fn resolve_atoms(atoms: &AtomCount) -> Result<(usize, Vec<String>)> {
    match (atoms.natoms, &atoms.geometry) {
        (Some(n), None) => Ok((n, Vec::new())),
        (None, Some(path)) => {
            let geom = xyz::parse_xyz_file(path)?;
            let elements = geom.atoms.iter().map(|a| a.element.clone()).collect();
            Ok((geom.num_atoms(), elements))
        }
        _ => Err(LotError::InvalidArgument(
            "give exactly one of --natoms or --geometry".to_string(),
        )),
    }
}
