//! # XYZ 格式读写
//!
//! ## XYZ 格式说明
//! ```text
//! N
//! comment
//! El x y z
//! ...
//! ```
//! 坐标单位为 Å。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/geometry.rs`

use crate::error::{LotError, Result};
use crate::models::{Atom, Geometry};
use crate::parsers::pattern::parse_float;
use std::fs;
use std::path::Path;

/// 解析 .xyz 文件
pub fn parse_xyz_file(path: &Path) -> Result<Geometry> {
    let content = fs::read_to_string(path).map_err(|e| LotError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_xyz_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 XYZ 格式
pub fn parse_xyz_content(content: &str, source: &str) -> Result<Geometry> {
    let err = |reason: String| LotError::ParseError {
        format: "XYZ".to_string(),
        path: source.to_string(),
        reason,
    };

    let mut lines = content.lines();

    let count_line = lines
        .next()
        .ok_or_else(|| err("file is empty".to_string()))?;
    let num_atoms: usize = count_line
        .trim()
        .parse()
        .map_err(|_| err(format!("line 1: invalid atom count '{}'", count_line.trim())))?;

    let comment = lines.next().unwrap_or("").trim().to_string();

    let mut atoms = Vec::with_capacity(num_atoms);
    for (i, line) in lines.take(num_atoms).enumerate() {
        let line_no = i + 3;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(err(format!(
                "line {}: expected 'symbol x y z', got '{}'",
                line_no,
                line.trim()
            )));
        }

        let mut position = [0.0; 3];
        for (k, text) in parts[1..4].iter().enumerate() {
            position[k] = parse_float(text).ok_or_else(|| {
                err(format!("line {}: invalid coordinate '{}'", line_no, text))
            })?;
        }
        atoms.push(Atom::new(parts[0], position));
    }

    if atoms.len() < num_atoms {
        return Err(err(format!(
            "expected {} atoms, found {}",
            num_atoms,
            atoms.len()
        )));
    }

    Ok(Geometry::new(comment, atoms))
}

/// 生成 XYZ 格式字符串
pub fn to_xyz_string(geom: &Geometry) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", geom.num_atoms()));
    output.push_str(&format!("{}\n", geom.comment));

    for atom in &geom.atoms {
        output.push_str(&format!(
            "{:<3} {:>18.10} {:>18.10} {:>18.10}\n",
            atom.element, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    output
}

/// 写入 XYZ 文件
pub fn write_xyz_file(geom: &Geometry, path: &Path) -> Result<()> {
    fs::write(path, to_xyz_string(geom)).map_err(|e| LotError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "3\nwater molecule\nO 0.000 0.000 0.117\nH 0.000 0.757 -0.469\nH 0.000 -0.757 -0.469\n";

    #[test]
    fn test_parse_xyz() {
        let geom = parse_xyz_content(WATER, "water.xyz").unwrap();
        assert_eq!(geom.comment, "water molecule");
        assert_eq!(geom.num_atoms(), 3);
        assert_eq!(geom.atoms[1].element, "H");
        assert_eq!(geom.atoms[2].position, [0.0, -0.757, -0.469]);
    }

    #[test]
    fn test_parse_xyz_truncated() {
        let content = "3\ntruncated\nO 0.0 0.0 0.0\n";
        assert!(matches!(
            parse_xyz_content(content, "bad.xyz"),
            Err(LotError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_xyz_bad_coordinate() {
        let content = "1\n\nO 0.0 zero 0.0\n";
        match parse_xyz_content(content, "bad.xyz").unwrap_err() {
            LotError::ParseError { reason, .. } => assert!(reason.contains("line 3")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_xyz_round_trip() {
        let geom = parse_xyz_content(WATER, "water.xyz").unwrap();
        let parsed = parse_xyz_content(&to_xyz_string(&geom), "round_trip").unwrap();
        assert_eq!(parsed, geom);
    }
}
