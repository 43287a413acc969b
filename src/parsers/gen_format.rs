//! # DFTB+ .gen 格式写出与晶格文件读取
//!
//! ## .gen 格式说明
//! ```text
//! N C|S
//! El1 El2 ...
//! 1 1 x y z
//! 2 2 x y z
//! ...
//! 0.0 0.0 0.0      (仅 S: 原点)
//! a1 a2 a3         (仅 S: 晶格向量)
//! b1 b2 b3
//! c1 c2 c3
//! ```
//! `C` 为团簇（非周期），`S` 为超胞笛卡尔坐标。
//!
//! 晶格文件为三行，每行一个晶格向量 (Å)。
//!
//! ## 依赖关系
//! - 被 `lot/dftb.rs` 使用
//! - 使用 `models/geometry.rs`

use crate::error::{LotError, Result};
use crate::models::{Geometry, Lattice};
use crate::parsers::pattern::parse_float;
use std::fs;
use std::path::Path;

/// 生成 .gen 格式字符串
pub fn to_gen_string(geom: &Geometry, lattice: Option<&Lattice>) -> String {
    let mut output = String::new();
    let species = geom.species();

    let kind = if lattice.is_some() { "S" } else { "C" };
    output.push_str(&format!("{} {}\n", geom.num_atoms(), kind));
    output.push_str(&format!("{}\n", species.join(" ")));

    for (i, atom) in geom.atoms.iter().enumerate() {
        // species 由 geom 自身生成，必然包含该元素
        let type_index = species
            .iter()
            .position(|s| *s == atom.element)
            .map_or(0, |p| p + 1);
        output.push_str(&format!(
            "{:>5} {:>3} {:>18.10} {:>18.10} {:>18.10}\n",
            i + 1,
            type_index,
            atom.position[0],
            atom.position[1],
            atom.position[2]
        ));
    }

    if let Some(lattice) = lattice {
        output.push_str(&format!(
            "{:>18.10} {:>18.10} {:>18.10}\n",
            0.0, 0.0, 0.0
        ));
        for v in &lattice.vectors {
            output.push_str(&format!("{:>18.10} {:>18.10} {:>18.10}\n", v[0], v[1], v[2]));
        }
    }

    output
}

/// 写入 .gen 文件
pub fn write_gen_file(geom: &Geometry, lattice: Option<&Lattice>, path: &Path) -> Result<()> {
    fs::write(path, to_gen_string(geom, lattice)).map_err(|e| LotError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 读取晶格文件
pub fn parse_lattice_file(path: &Path) -> Result<Lattice> {
    let content = fs::read_to_string(path).map_err(|e| LotError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_lattice_content(&content, &path.display().to_string())
}

/// 从字符串内容解析晶格：前三个非空行，每行三个数
pub fn parse_lattice_content(content: &str, source: &str) -> Result<Lattice> {
    let err = |reason: String| LotError::ParseError {
        format: "lattice".to_string(),
        path: source.to_string(),
        reason,
    };

    let mut vectors = [[0.0; 3]; 3];
    let mut found = 0;

    for (i, line) in content.lines().enumerate() {
        if found == 3 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts.len() < 3 {
            return Err(err(format!(
                "line {}: expected three components, got '{}'",
                i + 1,
                line.trim()
            )));
        }
        for k in 0..3 {
            vectors[found][k] = parse_float(parts[k]).ok_or_else(|| {
                err(format!("line {}: invalid component '{}'", i + 1, parts[k]))
            })?;
        }
        found += 1;
    }

    if found < 3 {
        return Err(err(format!("expected 3 lattice vectors, found {}", found)));
    }

    Ok(Lattice::from_vectors(vectors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Atom;

    fn methanol_fragment() -> Geometry {
        Geometry::new(
            "",
            vec![
                Atom::new("C", [0.0, 0.0, 0.0]),
                Atom::new("O", [1.4, 0.0, 0.0]),
                Atom::new("H", [-0.5, 0.9, 0.0]),
                Atom::new("H", [1.7, 0.9, 0.0]),
            ],
        )
    }

    #[test]
    fn test_cluster_gen() {
        let text = to_gen_string(&methanol_fragment(), None);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "4 C");
        assert_eq!(lines[1], "C O H");
        assert_eq!(lines.len(), 6);

        let row: Vec<&str> = lines[5].split_whitespace().collect();
        assert_eq!(row[0], "4");
        assert_eq!(row[1], "3");
        assert_eq!(row[2].parse::<f64>().unwrap(), 1.7);
    }

    #[test]
    fn test_periodic_gen() {
        let lattice =
            Lattice::from_vectors([[10.0, 0.0, 0.0], [0.0, 11.0, 0.0], [0.0, 0.0, 12.0]]);
        let text = to_gen_string(&methanol_fragment(), Some(&lattice));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "4 S");
        assert_eq!(lines.len(), 10);

        let origin: Vec<f64> = lines[6]
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(origin, vec![0.0, 0.0, 0.0]);

        let c: Vec<f64> = lines[9]
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(c, vec![0.0, 0.0, 12.0]);
    }

    #[test]
    fn test_parse_lattice() {
        let content = "\n 10.0 0.0 0.0\n0.0 11.0 0.0\n0.0 0.0 12.0\n";
        let lattice = parse_lattice_content(content, "lattice").unwrap();
        assert_eq!(lattice.vectors[1], [0.0, 11.0, 0.0]);
    }

    #[test]
    fn test_parse_lattice_too_short() {
        let content = "10.0 0.0 0.0\n0.0 11.0 0.0\n";
        assert!(matches!(
            parse_lattice_content(content, "lattice"),
            Err(LotError::ParseError { .. })
        ));
    }
}
