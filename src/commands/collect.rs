//! # collect 命令实现
//!
//! 扫描工作目录根，并行解析每个 DFTB+ `detailed.out`，按能量排序。
//!
//! ## 功能
//! - 按 glob 模式查找输出文件
//! - 并行解析（rayon）
//! - 终端表格与 CSV 输出
//!
//! ## 依赖关系
//! - 使用 `cli/collect.rs` 定义的参数
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/dftb.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::collect::CollectArgs;
use crate::error::{LotError, Result};
use crate::parsers::dftb;
use crate::utils::{export, output};

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 单个输出文件的汇总
#[derive(Debug, Clone, Serialize)]
pub struct CollectedEnergy {
    pub file: String,
    pub energy_hartree: f64,
    pub rms_gradient: f64,
    pub max_gradient: f64,
}

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct EnergyRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Energy (Eh)")]
    energy: String,
    #[tabled(rename = "ΔE (Eh)")]
    delta_e: String,
    #[tabled(rename = "Max |g|")]
    max_gradient: String,
}

/// 执行 collect 命令
pub fn execute(args: CollectArgs) -> Result<()> {
    output::print_header("Collecting DFTB+ Results");

    if !args.root.exists() {
        return Err(LotError::DirectoryNotFound {
            path: args.root.display().to_string(),
        });
    }

    let files = FileCollector::new(args.root.clone())
        .with_pattern(&args.pattern)?
        .recursive(!args.no_recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No files matching '{}' under '{}'",
            args.pattern,
            args.root.display()
        ));
        return Ok(());
    }

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!(
        "Parsing {} files with {} jobs",
        files.len(),
        runner.jobs()
    ));

    let natoms = args.natoms;
    let batch = runner.run(files, |path| collect_one(path, natoms))?;

    for (path, err) in &batch.failures {
        output::print_warning(&format!("{}: {}", path, err));
    }

    let mut results = batch.successes;
    if results.is_empty() {
        output::print_warning("No output file could be parsed.");
        return Ok(());
    }

    results.sort_by(|a, b| {
        a.energy_hartree
            .partial_cmp(&b.energy_hartree)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    print_ranking(&results, args.top_n);

    export::rows_to_csv(&results, &args.output)?;

    output::print_separator();
    output::print_done(&format!(
        "Collected {} results ({} failed) into '{}'",
        results.len(),
        batch.failures.len(),
        args.output.display()
    ));

    Ok(())
}

fn collect_one(path: &Path, natoms: usize) -> ProcessResult<CollectedEnergy> {
    match dftb::parse_detailed_out_file(path, natoms) {
        Ok(result) => ProcessResult::Success(CollectedEnergy {
            file: path.display().to_string(),
            energy_hartree: result.energy(),
            rms_gradient: result.rms_gradient(),
            max_gradient: result.max_gradient(),
        }),
        Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
    }
}

/// 显示能量最低的前 N 个结果（results 已排序）
fn print_ranking(results: &[CollectedEnergy], top_n: usize) {
    let min_energy = results[0].energy_hartree;

    let rows: Vec<EnergyRow> = results
        .iter()
        .take(top_n)
        .enumerate()
        .map(|(i, r)| EnergyRow {
            rank: i + 1,
            file: r.file.clone(),
            energy: format!("{:.10}", r.energy_hartree),
            delta_e: format!("{:.6}", r.energy_hartree - min_energy),
            max_gradient: format!("{:.3e}", r.max_gradient),
        })
        .collect();

    output::print_header(&format!(
        "Lowest {} Energies",
        top_n.min(results.len())
    ));
    println!("{}", Table::new(rows));
}
