//! # DFTB+ 理论方法
//!
//! 每步计算：
//! 1. 写出 `tmp.xyz` 与 `tmp.gen`（有晶格文件时为周期性 `S` 格式）
//! 2. 在工作目录中运行 `dftb+`（输入模板已放置为 `dftb_in.hsd`）
//! 3. 追加 stdout/stderr 到 `dftb.out` / `dftb.err`
//! 4. 解析 `detailed.out`
//!
//! 输入模板应通过 `GenFormat { <<< "tmp.gen" }` 引用几何，
//! 并打开力的计算 (`Analysis { CalculateForces = Yes }`)。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `parsers/dftb.rs`, `parsers/gen_format.rs`, `parsers/xyz.rs`
//! - 使用 `runner/`

use super::LevelOfTheory;
use crate::error::Result;
use crate::models::{CalculationResult, Geometry, Lattice, StateKey};
use crate::parsers::{dftb, gen_format, xyz};
use crate::runner::process::command_line;
use crate::runner::{ProcessRunner, ScratchDir, SystemRunner};

use std::path::PathBuf;

/// DFTB+ 要求的输入文件名
pub const DFTB_INPUT: &str = "dftb_in.hsd";
const GEOMETRY_XYZ: &str = "tmp.xyz";
const GEOMETRY_GEN: &str = "tmp.gen";
const STDOUT_LOG: &str = "dftb.out";
const STDERR_LOG: &str = "dftb.err";

/// DFTB+ 计算配置
#[derive(Debug, Clone)]
pub struct DftbConfig {
    /// 可执行文件名或路径
    pub executable: String,
    /// DFTB+ 输入模板 (.hsd)
    pub input_template: PathBuf,
    /// 可选晶格文件，给出时按周期体系计算
    pub lattice_file: Option<PathBuf>,
    /// 工作目录根
    pub scratch_root: PathBuf,
    /// 节点编号，工作目录为 `<scratch_root>/<node_id>`
    pub node_id: usize,
    /// 结束后保留工作目录
    pub keep_scratch: bool,
}

impl Default for DftbConfig {
    fn default() -> Self {
        DftbConfig {
            executable: "dftb+".to_string(),
            input_template: PathBuf::from(DFTB_INPUT),
            lattice_file: None,
            scratch_root: PathBuf::from("scratch"),
            node_id: 0,
            keep_scratch: false,
        }
    }
}

/// DFTB+ 理论方法
pub struct DftbLot {
    executable: String,
    lattice: Option<Lattice>,
    scratch: ScratchDir,
    runner: Box<dyn ProcessRunner>,
}

impl DftbLot {
    /// 使用真实进程创建
    pub fn new(config: DftbConfig) -> Result<Self> {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// 使用指定的进程调用实现创建
    pub fn with_runner(config: DftbConfig, runner: Box<dyn ProcessRunner>) -> Result<Self> {
        let lattice = config
            .lattice_file
            .as_deref()
            .map(gen_format::parse_lattice_file)
            .transpose()?;

        let scratch = ScratchDir::for_node(&config.scratch_root, config.node_id)?
            .keep(config.keep_scratch);
        scratch.stage_as(&config.input_template, DFTB_INPUT)?;

        Ok(DftbLot {
            executable: config.executable,
            lattice,
            scratch,
            runner,
        })
    }

    pub fn is_periodic(&self) -> bool {
        self.lattice.is_some()
    }

    /// 一步计算：写几何、运行、记录日志、解析
    fn step(&mut self, geom: &Geometry) -> Result<CalculationResult> {
        xyz::write_xyz_file(geom, &self.scratch.join(GEOMETRY_XYZ))?;
        gen_format::write_gen_file(
            geom,
            self.lattice.as_ref(),
            &self.scratch.join(GEOMETRY_GEN),
        )?;

        // 防止读取上一步残留的输出
        self.scratch.remove_files(&[dftb::DETAILED_OUT])?;

        let args: Vec<String> = Vec::new();
        let output = self
            .runner
            .run(&self.executable, &args, self.scratch.path())?;

        self.scratch.append_log(STDOUT_LOG, "Stdout", &output.stdout)?;
        self.scratch.append_log(STDERR_LOG, "Stderr", &output.stderr)?;
        output.check(&command_line(&self.executable, &args))?;

        dftb::parse_detailed_out_file(&self.scratch.join(dftb::DETAILED_OUT), geom.num_atoms())
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }
}

impl LevelOfTheory for DftbLot {
    fn name(&self) -> &str {
        "DFTB+"
    }

    fn compute(&mut self, geom: &Geometry, key: StateKey) -> Result<CalculationResult> {
        let outcome = self.step(geom);
        self.scratch.set_failed(outcome.is_err());
        let result = outcome?;

        log::info!(
            "DFTB+ state {}: E = {:.10} Eh, max |g| = {:.6e}",
            key,
            result.energy(),
            result.max_gradient()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LotError;
    use crate::lot::testing::CannedRunner;
    use crate::models::Atom;
    use std::fs;
    use tempfile::TempDir;

    const DETAILED: &str = "Total energy:   -1.1372838345 H   -30.9468 eV\n\
                            \n\
                            Total Forces\n\
                            \x20   1   0.000000000000   0.000000000000  -0.004000000000\n\
                            \x20   2   0.000000000000   0.000000000000   0.004000000000\n";

    fn h2() -> Geometry {
        Geometry::new(
            "H2",
            vec![Atom::new("H", [0.0, 0.0, 0.0]), Atom::new("H", [0.0, 0.0, 0.74])],
        )
    }

    fn config(root: &TempDir) -> DftbConfig {
        let template = root.path().join("h2.hsd");
        fs::write(&template, "Geometry = GenFormat { <<< \"tmp.gen\" }\n").unwrap();
        DftbConfig {
            input_template: template,
            scratch_root: root.path().join("scratch"),
            keep_scratch: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_compute_with_canned_output() {
        let root = TempDir::new().unwrap();
        let runner = CannedRunner::new(&[(dftb::DETAILED_OUT, DETAILED)]);
        let mut lot = DftbLot::with_runner(config(&root), Box::new(runner)).unwrap();

        let result = lot.compute(&h2(), StateKey::ground()).unwrap();
        assert_eq!(result.energy(), -1.1372838345);
        assert_eq!(result.gradient()[0][2], 0.004);
        assert_eq!(result.gradient()[1][2], -0.004);

        let scratch = lot.scratch();
        assert!(scratch.join(DFTB_INPUT).exists());
        assert!(scratch.read(GEOMETRY_GEN).unwrap().starts_with("2 C\nH\n"));
        assert!(scratch.read(STDOUT_LOG).unwrap().contains("canned stdout"));
        assert!(!lot.is_periodic());
    }

    #[test]
    fn test_periodic_run_writes_supercell() {
        let root = TempDir::new().unwrap();
        let lattice = root.path().join("lattice.txt");
        fs::write(&lattice, "10 0 0\n0 10 0\n0 0 10\n").unwrap();

        let mut cfg = config(&root);
        cfg.lattice_file = Some(lattice);

        let runner = CannedRunner::new(&[(dftb::DETAILED_OUT, DETAILED)]);
        let mut lot = DftbLot::with_runner(cfg, Box::new(runner)).unwrap();
        lot.compute(&h2(), StateKey::ground()).unwrap();

        assert!(lot.is_periodic());
        assert!(lot.scratch().read(GEOMETRY_GEN).unwrap().starts_with("2 S\n"));
    }

    #[test]
    fn test_process_failure_is_fatal() {
        let root = TempDir::new().unwrap();
        let runner = CannedRunner::failing(2, "ERROR! Missing Slater-Koster file");
        let mut lot = DftbLot::with_runner(config(&root), Box::new(runner)).unwrap();

        let err = lot.compute(&h2(), StateKey::ground()).unwrap_err();
        assert!(matches!(err, LotError::ProcessFailure { code: Some(2), .. }));
        assert!(lot
            .scratch()
            .read(STDERR_LOG)
            .unwrap()
            .contains("Slater-Koster"));
    }

    #[test]
    fn test_failed_run_keeps_logs() {
        let root = TempDir::new().unwrap();
        let mut cfg = config(&root);
        cfg.keep_scratch = false;
        let scratch_path = root.path().join("scratch").join("0");

        let runner = CannedRunner::failing(1, "SCC is NOT converged");
        let mut lot = DftbLot::with_runner(cfg.clone(), Box::new(runner)).unwrap();
        assert!(lot.compute(&h2(), StateKey::ground()).is_err());
        drop(lot);

        let stderr = fs::read_to_string(scratch_path.join(STDERR_LOG)).unwrap();
        assert!(stderr.contains("SCC is NOT converged"));

        // 新建的目录在成功后清理
        fs::remove_dir_all(&scratch_path).unwrap();
        let runner = CannedRunner::new(&[(dftb::DETAILED_OUT, DETAILED)]);
        let mut lot = DftbLot::with_runner(cfg, Box::new(runner)).unwrap();
        lot.compute(&h2(), StateKey::ground()).unwrap();
        drop(lot);
        assert!(!scratch_path.exists());
    }

    #[test]
    fn test_missing_detailed_out() {
        let root = TempDir::new().unwrap();
        let runner = CannedRunner::new(&[]);
        let mut lot = DftbLot::with_runner(config(&root), Box::new(runner)).unwrap();

        assert!(matches!(
            lot.compute(&h2(), StateKey::ground()),
            Err(LotError::FileReadError { .. })
        ));
    }

    #[test]
    fn test_missing_template() {
        let root = TempDir::new().unwrap();
        let mut cfg = config(&root);
        cfg.input_template = root.path().join("missing.hsd");

        assert!(matches!(
            DftbLot::with_runner(cfg, Box::new(CannedRunner::new(&[]))),
            Err(LotError::FileNotFound { .. })
        ));
    }
}
