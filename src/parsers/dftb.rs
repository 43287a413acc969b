//! # DFTB+ detailed.out 解析器
//!
//! 从 DFTB+ 的 `detailed.out` 提取总能量和原子受力，转换为梯度。
//!
//! ## detailed.out 相关片段
//! ```text
//! Total energy:                      -5.7291568315 H         -155.8999 eV
//! ...
//! Total Forces
//!     1     -0.000141534950      0.000000000000     -0.018307436524
//!     2      0.000141534950      0.000000000000      0.018307436524
//! ```
//!
//! 力以 Hartree/Bohr 给出，梯度 = -1 × 力。
//!
//! ## 依赖关系
//! - 被 `lot/dftb.rs`, `commands/parse.rs`, `commands/collect.rs` 使用
//! - 使用 `parsers/pattern.rs` 的模式表
//! - 使用 `models/result.rs`

use crate::error::{LotError, Result};
use crate::models::CalculationResult;
use crate::parsers::pattern::{PatternTable, FLOAT};
use crate::units::DFTB_FORCE_TO_GRADIENT;

use lazy_static::lazy_static;
use std::fs;
use std::path::Path;

/// DFTB+ 详细输出文件名
pub const DETAILED_OUT: &str = "detailed.out";

const ENERGY: &str = "total_energy";
const FORCES_MARKER: &str = "total_forces";
const FORCE_ROW: &str = "force_row";

lazy_static! {
    static ref PATTERNS: PatternTable = PatternTable::new(&[
        (
            ENERGY,
            format!(r"Total energy:\s+(?P<value>{})\s+H\b", FLOAT).as_str(),
        ),
        (FORCES_MARKER, r"^\s*Total Forces\s*$"),
        (
            FORCE_ROW,
            format!(
                r"^\s*(?P<index>\d+)\s+(?P<x>{0})\s+(?P<y>{0})\s+(?P<z>{0})\s*$",
                FLOAT
            )
            .as_str(),
        ),
    ])
    .expect("DFTB pattern table is valid");
}

/// 解析 detailed.out 文件
pub fn parse_detailed_out_file(path: &Path, num_atoms: usize) -> Result<CalculationResult> {
    let content = fs::read_to_string(path).map_err(|e| LotError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_detailed_out(&content, num_atoms, &path.display().to_string())
}

/// 从字符串内容解析 detailed.out
///
/// `source` 仅用于错误信息中的文件上下文。
pub fn parse_detailed_out(
    content: &str,
    num_atoms: usize,
    source: &str,
) -> Result<CalculationResult> {
    // 文件可能被追加写入，取最后一个能量
    let energy = PATTERNS
        .find_last(ENERGY, content)
        .ok_or_else(|| LotError::MissingMarker {
            marker: "Total energy".to_string(),
            path: source.to_string(),
        })?
        .float("value", source)?;

    let forces = parse_force_block(content, num_atoms, source)?;
    let gradient = forces
        .into_iter()
        .map(|f| f.map(|c| DFTB_FORCE_TO_GRADIENT * c))
        .collect();

    log::debug!(
        "Parsed {}: E = {:.10} Eh, {} gradient rows",
        source,
        energy,
        num_atoms
    );

    CalculationResult::new(energy, gradient, num_atoms)
}

/// 读取 "Total Forces" 之后的 N 行受力
fn parse_force_block(content: &str, num_atoms: usize, source: &str) -> Result<Vec<[f64; 3]>> {
    // 与能量一致，取最后一个受力块
    let marker = PATTERNS
        .find_last(FORCES_MARKER, content)
        .ok_or_else(|| LotError::MissingMarker {
            marker: "Total Forces".to_string(),
            path: source.to_string(),
        })?;

    let mut forces = Vec::with_capacity(num_atoms);

    // marker.line_no 从 1 开始，恰好是下一行的 0 基索引
    for (offset, line) in content.lines().skip(marker.line_no).enumerate() {
        if forces.len() == num_atoms {
            break;
        }
        let line_no = marker.line_no + offset + 1;

        // 不以原子序号开头的行（含空行）意味着受力块提前结束
        let starts_with_index = line
            .split_whitespace()
            .next()
            .map_or(false, |t| t.parse::<usize>().is_ok());
        if !starts_with_index {
            break;
        }

        let row = PATTERNS
            .match_line(FORCE_ROW, line, line_no)
            .ok_or_else(|| LotError::MalformedRow {
                path: source.to_string(),
                line: line_no,
                reason: format!("expected 'index fx fy fz', got '{}'", line.trim()),
            })?;

        forces.push([
            row.float("x", source)?,
            row.float("y", source)?,
            row.float("z", source)?,
        ]);
    }

    if forces.len() < num_atoms {
        return Err(LotError::InsufficientRows {
            path: source.to_string(),
            expected: num_atoms,
            found: forces.len(),
        });
    }

    Ok(forces)
}
