//! # 分子几何数据模型
//!
//! 定义笛卡尔坐标下的分子结构，以及周期性 DFTB 计算所需的晶格。
//!
//! ## 依赖关系
//! - 被 `parsers/xyz.rs`, `parsers/gen.rs` 使用
//! - 被 `lot/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 晶格向量表示
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3, Å)，行向量表示 a, b, c
    pub vectors: [[f64; 3]; 3],
}

impl Lattice {
    pub fn from_vectors(vectors: [[f64; 3]; 3]) -> Self {
        Lattice { vectors }
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.vectors;
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 笛卡尔坐标 [x, y, z] (Å)
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 分子几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// 注释行 (XYZ 第二行)
    pub comment: String,

    /// 原子列表，顺序即梯度输出顺序
    pub atoms: Vec<Atom>,
}

impl Geometry {
    pub fn new(comment: impl Into<String>, atoms: Vec<Atom>) -> Self {
        Geometry {
            comment: comment.into(),
            atoms,
        }
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// 按首次出现顺序列出不同的元素
    pub fn species(&self) -> Vec<&str> {
        let mut species: Vec<&str> = Vec::new();
        for atom in &self.atoms {
            if !species.contains(&atom.element.as_str()) {
                species.push(atom.element.as_str());
            }
        }
        species
    }

    /// 判断两个几何的坐标是否完全相同（元素与顺序也需一致）
    pub fn same_coordinates(&self, other: &Geometry) -> bool {
        self.atoms.len() == other.atoms.len()
            && self
                .atoms
                .iter()
                .zip(other.atoms.iter())
                .all(|(a, b)| a.element == b.element && a.position == b.position)
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
