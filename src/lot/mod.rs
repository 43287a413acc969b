//! # 理论方法（level of theory）模块
//!
//! 每个理论方法负责一次完整的单点计算：写几何、调用外部程序、解析输出。
//! `Calculator` 在其上提供按坐标缓存的能量/梯度查询，供几何优化驱动使用。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `runner/`, `parsers/`, `models/`
//! - 子模块: dftb, qmcfc

pub mod dftb;
pub mod qmcfc;

pub use dftb::{DftbConfig, DftbLot};
pub use qmcfc::{QmcfcConfig, QmcfcLot};

use crate::error::{LotError, Result};
use crate::models::{CalculationResult, Geometry, ResultStore, StateKey};

/// 外部程序驱动的理论方法
pub trait LevelOfTheory {
    /// 方法名称（用于日志）
    fn name(&self) -> &str;

    /// 对给定几何与电子态做一次计算
    fn compute(&mut self, geom: &Geometry, key: StateKey) -> Result<CalculationResult>;
}

impl<L: LevelOfTheory + ?Sized> LevelOfTheory for Box<L> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compute(&mut self, geom: &Geometry, key: StateKey) -> Result<CalculationResult> {
        (**self).compute(geom, key)
    }
}

/// 按坐标缓存结果的计算前端
///
/// 坐标不变时重复查询不会再次调用外部程序；坐标改变后清空所有电子态的结果。
pub struct Calculator<L: LevelOfTheory> {
    lot: L,
    current: Option<Geometry>,
    results: ResultStore,
    runs: usize,
}

impl<L: LevelOfTheory> Calculator<L> {
    pub fn new(lot: L) -> Self {
        Calculator {
            lot,
            current: None,
            results: ResultStore::new(),
            runs: 0,
        }
    }

    /// 能量 (Hartree)
    pub fn energy(&mut self, geom: &Geometry, multiplicity: u32, state: usize) -> Result<f64> {
        Ok(self.result(geom, StateKey::new(multiplicity, state))?.energy())
    }

    /// 梯度 (Hartree/Bohr)
    pub fn gradient(
        &mut self,
        geom: &Geometry,
        multiplicity: u32,
        state: usize,
    ) -> Result<Vec<[f64; 3]>> {
        Ok(self
            .result(geom, StateKey::new(multiplicity, state))?
            .gradient()
            .to_vec())
    }

    /// 完整结果，必要时触发计算
    pub fn result(&mut self, geom: &Geometry, key: StateKey) -> Result<&CalculationResult> {
        let moved = match &self.current {
            Some(current) => !current.same_coordinates(geom),
            None => true,
        };
        if moved {
            self.results.clear();
            self.current = Some(geom.clone());
        }

        if !self.results.contains(key) {
            log::info!(
                "{}: computing state {} for {} atoms",
                self.lot.name(),
                key,
                geom.num_atoms()
            );
            let result = self.lot.compute(geom, key)?;
            if result.num_atoms() != geom.num_atoms() {
                return Err(LotError::InsufficientRows {
                    path: self.lot.name().to_string(),
                    expected: geom.num_atoms(),
                    found: result.num_atoms(),
                });
            }
            self.runs += 1;
            self.results.record(key, result);
        }

        self.results.get(key)
    }

    /// 外部程序被调用的次数
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn lot(&self) -> &L {
        &self.lot
    }

    pub fn into_inner(self) -> L {
        self.lot
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 测试用的预置输出进程

    use crate::error::Result;
    use crate::runner::{ProcessOutput, ProcessRunner};
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    /// 每次运行时把预置文件写入工作目录，并记录调用
    pub struct CannedRunner {
        pub files: Vec<(String, String)>,
        pub output: ProcessOutput,
        pub calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl CannedRunner {
        pub fn new(files: &[(&str, &str)]) -> Self {
            CannedRunner {
                files: files
                    .iter()
                    .map(|(n, c)| (n.to_string(), c.to_string()))
                    .collect(),
                output: ProcessOutput {
                    stdout: "canned stdout".to_string(),
                    stderr: String::new(),
                    exit_code: Some(0),
                },
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn failing(code: i32, stderr: &str) -> Self {
            let mut runner = CannedRunner::new(&[]);
            runner.output.exit_code = Some(code);
            runner.output.stderr = stderr.to_string();
            runner
        }
    }

    impl ProcessRunner for CannedRunner {
        fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            for (name, content) in &self.files {
                fs::write(cwd.join(name), content).unwrap();
            }
            Ok(self.output.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Atom;

    struct CountingLot {
        calls: usize,
    }

    impl LevelOfTheory for CountingLot {
        fn name(&self) -> &str {
            "counting"
        }

        fn compute(&mut self, geom: &Geometry, key: StateKey) -> Result<CalculationResult> {
            self.calls += 1;
            let energy = -(key.multiplicity as f64) - geom.atoms[0].position[0];
            CalculationResult::new(energy, vec![[0.1, 0.0, 0.0]; geom.num_atoms()], geom.num_atoms())
        }
    }

    struct ShortLot;

    impl LevelOfTheory for ShortLot {
        fn name(&self) -> &str {
            "short"
        }

        fn compute(&mut self, _geom: &Geometry, _key: StateKey) -> Result<CalculationResult> {
            CalculationResult::new(-1.0, vec![], 0)
        }
    }

    fn h2(x: f64) -> Geometry {
        Geometry::new(
            "",
            vec![Atom::new("H", [x, 0.0, 0.0]), Atom::new("H", [x + 0.74, 0.0, 0.0])],
        )
    }

    #[test]
    fn test_no_rerun_for_same_coordinates() {
        let mut calc = Calculator::new(CountingLot { calls: 0 });
        let geom = h2(0.0);

        assert_eq!(calc.energy(&geom, 1, 0).unwrap(), -1.0);
        assert_eq!(calc.gradient(&geom, 1, 0).unwrap().len(), 2);
        assert_eq!(calc.runs(), 1);

        // 新电子态需要计算
        assert_eq!(calc.energy(&geom, 3, 0).unwrap(), -3.0);
        assert_eq!(calc.runs(), 2);
        assert_eq!(calc.results().len(), 2);
    }

    #[test]
    fn test_rerun_after_move() {
        let mut calc = Calculator::new(CountingLot { calls: 0 });
        calc.energy(&h2(0.0), 1, 0).unwrap();
        calc.energy(&h2(0.0), 3, 0).unwrap();

        assert_eq!(calc.energy(&h2(0.5), 1, 0).unwrap(), -1.5);
        assert_eq!(calc.runs(), 3);
        assert_eq!(calc.results().len(), 1);
        assert_eq!(calc.into_inner().calls, 3);
    }

    #[test]
    fn test_row_count_checked_against_geometry() {
        let mut calc = Calculator::new(ShortLot);
        assert!(matches!(
            calc.energy(&h2(0.0), 1, 0),
            Err(LotError::InsufficientRows {
                expected: 2,
                found: 0,
                ..
            })
        ));
        assert_eq!(calc.runs(), 0);
    }
}
