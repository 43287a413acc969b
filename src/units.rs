//! # 单位换算常量
//!
//! 所有结果统一为 Hartree（能量）与 Hartree/Bohr（梯度）。
//! 各程序原生单位到该体系的换算常量集中在此处。
//!
//! ## 依赖关系
//! - 被 `parsers/qmcfc.rs` 使用

/// kcal/mol -> Hartree
pub const KCAL_MOL_TO_HARTREE: f64 = 0.0015936010974213599;

/// QMCFC 力 (kcal/mol/Å) -> 梯度 (Hartree/Bohr)
///
/// 同时包含单位换算和力到梯度的符号翻转。
pub const QMCFC_FORCE_TO_GRADIENT: f64 = -8.4329744e-4;

/// DFTB+ 力 (Hartree/Bohr) -> 梯度 (Hartree/Bohr)，仅符号翻转
pub const DFTB_FORCE_TO_GRADIENT: f64 = -1.0;
