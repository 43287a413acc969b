//! # qmlot - 外部量子化学程序的能量/梯度适配层
//!
//! 为几何优化与分子动力学驱动提供统一的理论方法接口：
//! 写出几何、调用 DFTB+ / QMCFC、解析输出，得到 Hartree 能量与 Hartree/Bohr 梯度。
//!
//! ## 作为库使用
//! ```no_run
//! use qmlot::lot::{Calculator, DftbConfig, DftbLot};
//! use qmlot::parsers::xyz;
//! use std::path::Path;
//!
//! fn main() -> qmlot::error::Result<()> {
//!     let geom = xyz::parse_xyz_file(Path::new("h2.xyz"))?;
//!     let mut calc = Calculator::new(DftbLot::new(DftbConfig::default())?);
//!     let energy = calc.energy(&geom, 1, 0)?;
//!     let gradient = calc.gradient(&geom, 1, 0)?;
//!     println!("{} {:?}", energy, gradient);
//!     Ok(())
//! }
//! ```
//!
//! ## 模块
//! ```text
//! lib.rs
//!   ├── lot/        (理论方法与结果缓存)
//!   │     └── runner/ (外部进程与工作目录)
//!   ├── parsers/    (输出与几何解析)
//!   ├── models/     (数据模型)
//!   ├── units.rs    (单位换算常量)
//!   ├── error.rs    (错误处理)
//!   └── 命令行部分: cli/, commands/, batch/, utils/
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod lot;
pub mod models;
pub mod parsers;
pub mod runner;
pub mod units;
pub mod utils;

pub use error::{LotError, Result};
pub use lot::{Calculator, LevelOfTheory};
pub use models::{CalculationResult, Geometry, StateKey};
