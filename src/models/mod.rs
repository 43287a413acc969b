//! # 数据模型模块
//!
//! 定义分子几何与计算结果数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `lot/` 和 `commands/` 使用
//! - 子模块: geometry, result

pub mod geometry;
pub mod result;

pub use geometry::{Atom, Geometry, Lattice};
pub use result::{CalculationResult, ResultStore, StateKey};
