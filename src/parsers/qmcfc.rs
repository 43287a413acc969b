//! # QMCFC 输出解析器
//!
//! 解析 QMCFC 的三个结果文件：
//! - info 文件：列出能量文件中每一列的含义，用来定位 `E(QM)` 与 `E(MM)` 列
//! - 能量文件：单行、空格分隔的数值 (kcal/mol)
//! - 力文件：2 行头部 + 每原子一行 (kcal/mol/Å)，`x` 开头的虚粒子行跳过
//!
//! 另外解析 QMCFC 输入模板中 `key = value;` 形式的文件声明。
//!
//! ## info 文件格式
//! ```text
//!  -------------------------------------------------
//!  | QMCFC energy file layout                      |
//!  -------------------------------------------------
//!  | E(tot)      kcal/mol   E(kin)      kcal/mol   |
//!  | E(QM)       kcal/mol   E(MM)       kcal/mol   |
//!  -------------------------------------------------
//! ```
//! 第 4 行起（不含最后一行）每行描述两列：左侧标签对应列 `2*i`，
//! 右侧标签（第 3 个词）对应列 `2*i+1`，`i` 为该行在窗口内的位置。
//!
//! ## 依赖关系
//! - 被 `lot/qmcfc.rs`, `commands/parse.rs` 使用
//! - 使用 `units.rs` 中的换算常量

use crate::error::{LotError, Result};
use crate::models::CalculationResult;
use crate::parsers::pattern::parse_float;
use crate::units::{KCAL_MOL_TO_HARTREE, QMCFC_FORCE_TO_GRADIENT};

use std::fs;
use std::path::Path;

const QM_LABEL: &str = "E(QM)";
const MM_LABEL: &str = "E(MM)";

/// 能量文件中 QM 与 MM 能量所在列（0 基）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyColumns {
    pub qm: usize,
    pub mm: usize,
}

/// QMCFC 输入模板中的文件声明
#[derive(Debug, Clone)]
pub struct InputDeclarations {
    source: String,
    lines: Vec<String>,
}

impl InputDeclarations {
    /// 读取输入模板文件
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| LotError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::from_content(&content, &path.display().to_string()))
    }

    pub fn from_content(content: &str, source: &str) -> Self {
        InputDeclarations {
            source: source.to_string(),
            lines: content.lines().map(|l| l.to_string()).collect(),
        }
    }

    /// 查询声明值：第一条以 `key` 开头的行中 `=` 之后的部分
    pub fn declared(&self, key: &str) -> Option<String> {
        self.lines
            .iter()
            .find(|line| line.trim().starts_with(key))
            .and_then(|line| line.split('=').nth(1))
            .map(|value| {
                value
                    .trim_matches(|c: char| c == ' ' || c == '\t' || c == ';' || c == '\n')
                    .to_string()
            })
            .filter(|value| !value.is_empty())
    }

    /// 查询必需的声明值，缺失时返回 MalformedInputSpec
    pub fn required(&self, key: &str) -> Result<String> {
        self.declared(key).ok_or_else(|| LotError::MalformedInputSpec {
            path: self.source.clone(),
            key: key.to_string(),
        })
    }
}

/// 从 info 文件内容确定 E(QM) 与 E(MM) 所在列
pub fn parse_energy_columns(content: &str, source: &str) -> Result<EnergyColumns> {
    let lines: Vec<&str> = content.lines().collect();
    let window: &[&str] = if lines.len() > 4 {
        &lines[3..lines.len() - 1]
    } else {
        &[]
    };

    let mut qm: Option<usize> = None;
    let mut mm: Option<usize> = None;

    for (i, line) in window.iter().enumerate() {
        if line.starts_with("--") || line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line
            .trim_matches(|c: char| c == '\n' || c == ' ' || c == '|')
            .split_whitespace()
            .collect();

        match parts.first().copied() {
            Some(QM_LABEL) => qm = Some(2 * i),
            Some(MM_LABEL) => mm = Some(2 * i),
            _ => {}
        }
        match parts.get(2).copied() {
            Some(QM_LABEL) => qm = Some(2 * i + 1),
            Some(MM_LABEL) => mm = Some(2 * i + 1),
            _ => {}
        }
    }

    let qm = qm.ok_or_else(|| LotError::MissingMarker {
        marker: QM_LABEL.to_string(),
        path: source.to_string(),
    })?;
    let mm = mm.ok_or_else(|| LotError::MissingMarker {
        marker: MM_LABEL.to_string(),
        path: source.to_string(),
    })?;

    Ok(EnergyColumns { qm, mm })
}

/// 从能量文件第一行读取 QM + MM 能量并换算为 Hartree
pub fn parse_total_energy(content: &str, columns: EnergyColumns, source: &str) -> Result<f64> {
    let line = content.lines().next().ok_or_else(|| LotError::MalformedOutput {
        path: source.to_string(),
        reason: "energy file is empty".to_string(),
    })?;
    let values: Vec<&str> = line.split_whitespace().collect();

    let column = |index: usize, label: &str| -> Result<f64> {
        let text = values.get(index).ok_or_else(|| LotError::MalformedRow {
            path: source.to_string(),
            line: 1,
            reason: format!(
                "{} column {} missing, line has {} columns",
                label,
                index,
                values.len()
            ),
        })?;
        parse_float(text).ok_or_else(|| LotError::MalformedRow {
            path: source.to_string(),
            line: 1,
            reason: format!("{} value '{}' is not a number", label, text),
        })
    };

    let qm_energy = column(columns.qm, QM_LABEL)?;
    let mm_energy = column(columns.mm, MM_LABEL)?;

    Ok((qm_energy + mm_energy) * KCAL_MOL_TO_HARTREE)
}

/// 读取力文件并换算为梯度 (Hartree/Bohr)
pub fn parse_gradient(content: &str, num_atoms: usize, source: &str) -> Result<Vec<[f64; 3]>> {
    let mut gradient = Vec::with_capacity(num_atoms);

    // 跳过头两行：原子数 + 注释
    for (i, line) in content.lines().enumerate().skip(2) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            continue;
        };
        // 虚粒子
        if first.eq_ignore_ascii_case("x") {
            continue;
        }

        if tokens.len() != 4 {
            return Err(LotError::MalformedRow {
                path: source.to_string(),
                line: i + 1,
                reason: format!("expected 'label fx fy fz', got '{}'", line.trim()),
            });
        }

        let mut row = [0.0; 3];
        for (k, text) in tokens[1..4].iter().enumerate() {
            let force = parse_float(text).ok_or_else(|| LotError::MalformedRow {
                path: source.to_string(),
                line: i + 1,
                reason: format!("force component '{}' is not a number", text),
            })?;
            row[k] = QMCFC_FORCE_TO_GRADIENT * force;
        }
        gradient.push(row);
    }

    if gradient.len() < num_atoms {
        return Err(LotError::InsufficientRows {
            path: source.to_string(),
            expected: num_atoms,
            found: gradient.len(),
        });
    }
    if gradient.len() > num_atoms {
        return Err(LotError::MalformedOutput {
            path: source.to_string(),
            reason: format!(
                "{} force rows for {} atoms",
                gradient.len(),
                num_atoms
            ),
        });
    }

    Ok(gradient)
}

/// QMCFC 三个结果文件的内容
#[derive(Debug, Clone, Copy)]
pub struct QmcfcOutputs<'a> {
    pub info: &'a str,
    pub energy: &'a str,
    pub forces: &'a str,
}

/// 由三个结果文件内容得到完整计算结果
pub fn parse_outputs(outputs: QmcfcOutputs<'_>, num_atoms: usize) -> Result<CalculationResult> {
    parse_outputs_labeled(outputs, num_atoms, ["info", "energy", "forces"])
}

/// 读取三个结果文件并解析
pub fn parse_output_files(
    info_path: &Path,
    energy_path: &Path,
    force_path: &Path,
    num_atoms: usize,
) -> Result<CalculationResult> {
    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|e| LotError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })
    };
    let info = read(info_path)?;
    let energy = read(energy_path)?;
    let forces = read(force_path)?;

    let info_label = info_path.display().to_string();
    let energy_label = energy_path.display().to_string();
    let force_label = force_path.display().to_string();

    parse_outputs_labeled(
        QmcfcOutputs {
            info: &info,
            energy: &energy,
            forces: &forces,
        },
        num_atoms,
        [info_label.as_str(), energy_label.as_str(), force_label.as_str()],
    )
}

fn parse_outputs_labeled(
    outputs: QmcfcOutputs<'_>,
    num_atoms: usize,
    [info_src, energy_src, force_src]: [&str; 3],
) -> Result<CalculationResult> {
    let columns = parse_energy_columns(outputs.info, info_src)?;
    let energy = parse_total_energy(outputs.energy, columns, energy_src)?;
    let gradient = parse_gradient(outputs.forces, num_atoms, force_src)?;

    log::debug!(
        "Parsed QMCFC outputs: E(QM) col {}, E(MM) col {}, E = {:.10} Eh",
        columns.qm,
        columns.mm,
        energy
    );

    CalculationResult::new(energy, gradient, num_atoms)
}
