//! # 计算结果展示
//!
//! 终端表格输出与可选 CSV 导出，供 run/parse 命令共用。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/parse.rs` 使用
//! - 使用 `utils/output.rs`, `utils/export.rs`

use crate::error::Result;
use crate::models::{CalculationResult, StateKey};
use crate::utils::{export, output};

use std::path::Path;
use tabled::{Table, Tabled};

/// 梯度表格行
#[derive(Debug, Clone, Tabled)]
struct GradientRow {
    #[tabled(rename = "Atom")]
    atom: usize,
    #[tabled(rename = "El")]
    element: String,
    #[tabled(rename = "gx (Eh/a0)")]
    gx: String,
    #[tabled(rename = "gy (Eh/a0)")]
    gy: String,
    #[tabled(rename = "gz (Eh/a0)")]
    gz: String,
}

/// 打印能量、梯度表，并按需写出 CSV
pub fn present(
    key: StateKey,
    result: &CalculationResult,
    elements: &[String],
    output_csv: Option<&Path>,
) -> Result<()> {
    output::print_header(&format!("State {} ({} atoms)", key, result.num_atoms()));
    output::print_value("Energy", result.energy(), "Eh");
    output::print_value("RMS gradient", result.rms_gradient(), "Eh/a0");
    output::print_value("Max gradient", result.max_gradient(), "Eh/a0");
    println!();

    let rows: Vec<GradientRow> = result
        .gradient()
        .iter()
        .enumerate()
        .map(|(i, g)| GradientRow {
            atom: i + 1,
            element: elements.get(i).cloned().unwrap_or_default(),
            gx: format!("{:>14.8}", g[0]),
            gy: format!("{:>14.8}", g[1]),
            gz: format!("{:>14.8}", g[2]),
        })
        .collect();
    println!("{}", Table::new(rows));

    if let Some(path) = output_csv {
        export::gradient_to_csv(result, elements, path)?;
        output::print_success(&format!("Gradient written to '{}'", path.display()));
    }

    Ok(())
}
