//! # run 命令实现
//!
//! 对一个几何调用 DFTB+ 或 QMCFC 完成一步能量/梯度计算。
//!
//! ## 功能
//! - 读取 XYZ 几何
//! - 准备工作目录并调用外部程序
//! - 显示能量与梯度，可选导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `lot/`, `parsers/xyz.rs`
//! - 使用 `commands/report.rs`, `utils/progress.rs`

use crate::cli::run::{CommonRunArgs, DftbRunArgs, QmcfcRunArgs, RunArgs, RunCommands};
use crate::commands::report;
use crate::error::{LotError, Result};
use crate::lot::{Calculator, DftbConfig, DftbLot, LevelOfTheory, QmcfcConfig, QmcfcLot};
use crate::models::{Geometry, StateKey};
use crate::parsers::xyz;
use crate::utils::{output, progress};

/// 执行 run 命令
pub fn execute(args: RunArgs) -> Result<()> {
    match args.command {
        RunCommands::Dftb(args) => execute_dftb(args),
        RunCommands::Qmcfc(args) => execute_qmcfc(args),
    }
}

fn execute_dftb(args: DftbRunArgs) -> Result<()> {
    output::print_header("DFTB+ Energy and Gradient");
    let geom = load_geometry(&args.common)?;

    if let Some(lattice) = &args.lattice {
        output::print_info(&format!("Periodic run, lattice from '{}'", lattice.display()));
    }

    let lot = DftbLot::new(DftbConfig {
        executable: args.exec,
        input_template: args.input,
        lattice_file: args.lattice,
        scratch_root: args.common.scratch.clone(),
        node_id: args.common.node_id,
        keep_scratch: args.common.keep_scratch,
    })?;

    compute_and_report(lot, &geom, &args.common)
}

fn execute_qmcfc(args: QmcfcRunArgs) -> Result<()> {
    output::print_header("QMCFC Energy and Gradient");
    let geom = load_geometry(&args.common)?;

    let lot = QmcfcLot::new(QmcfcConfig {
        executable: args.exec,
        input_template: args.input,
        scratch_root: args.common.scratch.clone(),
        node_id: args.common.node_id,
        keep_scratch: args.common.keep_scratch,
    })?;

    compute_and_report(lot, &geom, &args.common)
}

fn load_geometry(common: &CommonRunArgs) -> Result<Geometry> {
    if !common.geometry.exists() {
        return Err(LotError::FileNotFound {
            path: common.geometry.display().to_string(),
        });
    }
    let geom = xyz::parse_xyz_file(&common.geometry)?;
    output::print_info(&format!(
        "Loaded {} ({} atoms) from '{}'",
        geom.formula(),
        geom.num_atoms(),
        common.geometry.display()
    ));
    Ok(geom)
}

fn compute_and_report<L: LevelOfTheory>(
    lot: L,
    geom: &Geometry,
    common: &CommonRunArgs,
) -> Result<()> {
    let key = StateKey::new(common.multiplicity, common.state);
    let mut calculator = Calculator::new(lot);

    let spinner = progress::create_spinner(&format!("Running {}...", calculator.lot().name()));
    let outcome = calculator.result(geom, key).cloned();
    spinner.finish_and_clear();
    let result = outcome?;

    let elements: Vec<String> = geom.atoms.iter().map(|a| a.element.clone()).collect();
    report::present(key, &result, &elements, common.output_csv.as_deref())?;

    output::print_done(&format!(
        "{} finished ({} run)",
        calculator.lot().name(),
        calculator.runs()
    ));
    Ok(())
}
