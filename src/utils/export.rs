//! # 结果导出
//!
//! 导出梯度与能量到 CSV。
//!
//! ## 支持格式
//! - 梯度 CSV: atom, element, gx, gy, gz (Hartree/Bohr)
//! - 能量 CSV: 由 `serde` 序列化的任意行类型
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/parse.rs`, `commands/collect.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{LotError, Result};
use crate::models::CalculationResult;

use serde::Serialize;
use std::path::Path;

/// 导出梯度为 CSV，`elements` 为空时元素列留空
pub fn gradient_to_csv(
    result: &CalculationResult,
    elements: &[String],
    output_path: &Path,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["atom", "element", "gx", "gy", "gz"])?;

    for (i, g) in result.gradient().iter().enumerate() {
        let element = elements.get(i).map(|s| s.as_str()).unwrap_or("");
        wtr.write_record(&[
            (i + 1).to_string(),
            element.to_string(),
            format!("{:.12e}", g[0]),
            format!("{:.12e}", g[1]),
            format!("{:.12e}", g[2]),
        ])?;
    }

    wtr.flush().map_err(|e| LotError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出可序列化的行
pub fn rows_to_csv<R: Serialize>(rows: &[R], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| LotError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_gradient_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grad.csv");
        let result =
            CalculationResult::new(-1.0, vec![[0.5, -0.25, 0.0], [0.0, 0.0, 1.0]], 2).unwrap();

        gradient_to_csv(&result, &["O".to_string()], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "atom,element,gx,gy,gz");
        assert!(lines[1].starts_with("1,O,5.000000000000e-1,"));
        assert!(lines[2].starts_with("2,,"));
    }

    #[derive(Serialize)]
    struct Row {
        name: String,
        energy: f64,
    }

    #[test]
    fn test_rows_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.csv");
        rows_to_csv(
            &[Row {
                name: "0".to_string(),
                energy: -1.5,
            }],
            &path,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "name,energy\n0,-1.5\n");
    }
}
