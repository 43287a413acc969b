//! # 计算结果数据模型
//!
//! 存储单步计算得到的能量与梯度，以及按电子态索引的结果表。
//!
//! ## 依赖关系
//! - 被 `parsers/dftb.rs`, `parsers/qmcfc.rs` 构造
//! - 被 `lot/`, `commands/` 使用

use crate::error::{LotError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 电子态标识 (自旋多重度, 态索引)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateKey {
    /// 自旋多重度（单重态 = 1，三重态 = 3）
    pub multiplicity: u32,
    /// 同一多重度内的态索引（0 = 最低态）
    pub state: usize,
}

impl StateKey {
    pub fn new(multiplicity: u32, state: usize) -> Self {
        StateKey {
            multiplicity,
            state,
        }
    }

    /// 单重态基态
    pub fn ground() -> Self {
        StateKey::new(1, 0)
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.multiplicity, self.state)
    }
}

/// 单步计算结果
///
/// 能量单位 Hartree，梯度单位 Hartree/Bohr，每个原子一个三维向量，
/// 顺序与输入几何一致。构造后不可修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    energy: f64,
    gradient: Vec<[f64; 3]>,
}

impl CalculationResult {
    /// 创建结果并检查梯度行数与原子数一致
    pub fn new(energy: f64, gradient: Vec<[f64; 3]>, num_atoms: usize) -> Result<Self> {
        if gradient.len() != num_atoms {
            return Err(LotError::InsufficientRows {
                path: "gradient".to_string(),
                expected: num_atoms,
                found: gradient.len(),
            });
        }
        Ok(CalculationResult { energy, gradient })
    }

    /// 能量 (Hartree)
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// 梯度 (Hartree/Bohr)
    pub fn gradient(&self) -> &[[f64; 3]] {
        &self.gradient
    }

    pub fn num_atoms(&self) -> usize {
        self.gradient.len()
    }

    /// 梯度均方根
    pub fn rms_gradient(&self) -> f64 {
        if self.gradient.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self
            .gradient
            .iter()
            .flat_map(|row| row.iter())
            .map(|g| g * g)
            .sum();
        (sum_sq / (3 * self.gradient.len()) as f64).sqrt()
    }

    /// 梯度最大分量（绝对值）
    pub fn max_gradient(&self) -> f64 {
        self.gradient
            .iter()
            .flat_map(|row| row.iter())
            .fold(0.0_f64, |acc, g| acc.max(g.abs()))
    }
}

/// 按电子态保存的结果表
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    results: BTreeMap<StateKey, CalculationResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录结果；同一电子态的新结果覆盖旧结果
    pub fn record(&mut self, key: StateKey, result: CalculationResult) {
        self.results.insert(key, result);
    }

    pub fn get(&self, key: StateKey) -> Result<&CalculationResult> {
        self.results.get(&key).ok_or(LotError::StateNotComputed {
            multiplicity: key.multiplicity,
            state: key.state,
        })
    }

    pub fn energy(&self, key: StateKey) -> Result<f64> {
        self.get(key).map(|r| r.energy())
    }

    pub fn gradient(&self, key: StateKey) -> Result<&[[f64; 3]]> {
        self.get(key).map(|r| r.gradient())
    }

    pub fn contains(&self, key: StateKey) -> bool {
        self.results.contains_key(&key)
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_rejects_row_mismatch() {
        let err = CalculationResult::new(-1.0, vec![[0.0; 3]], 2).unwrap_err();
        assert!(matches!(
            err,
            LotError::InsufficientRows {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_gradient_norms() {
        let result =
            CalculationResult::new(-1.0, vec![[0.1, -0.2, 0.0], [0.0, 0.0, 0.2]], 2).unwrap();
        assert!((result.max_gradient() - 0.2).abs() < 1e-12);
        let expected_rms = ((0.01 + 0.04 + 0.04) / 6.0_f64).sqrt();
        assert!((result.rms_gradient() - expected_rms).abs() < 1e-12);
    }

    #[test]
    fn test_store_lookup() {
        let mut store = ResultStore::new();
        let key = StateKey::new(3, 1);
        assert!(matches!(
            store.energy(key),
            Err(LotError::StateNotComputed {
                multiplicity: 3,
                state: 1
            })
        ));

        store.record(key, CalculationResult::new(-2.5, vec![], 0).unwrap());
        assert_eq!(store.energy(key).unwrap(), -2.5);

        // 同一电子态覆盖
        store.record(key, CalculationResult::new(-3.0, vec![], 0).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.energy(key).unwrap(), -3.0);
    }

    #[test]
    fn test_state_key_display() {
        assert_eq!(StateKey::ground().to_string(), "(1, 0)");
    }
}
