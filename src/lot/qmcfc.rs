//! # QMCFC 理论方法
//!
//! QMCFC 为 QM/MM 分子动力学程序，这里把它当作单点能量/力计算器使用。
//!
//! 初始化时：
//! - 从输入模板（run-xx.in / md-xx.in）读取 `info_file`、`energy_file`、
//!   `force_file`（必需）以及 `start_file`、`parameter_file`、`topology_file` 声明
//! - 将声明的文件、固定名称的辅助文件和模板本身放入工作目录
//! - 写出 `traj_list.dat`，指向每步写出的 `geom.xyz`
//!
//! 起始 rst 文件必须包含正确的 moldescriptor 数据，其中的坐标/力/速度可以任意。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `parsers/qmcfc.rs`, `parsers/xyz.rs`
//! - 使用 `runner/`

use super::LevelOfTheory;
use crate::error::{LotError, Result};
use crate::models::{CalculationResult, Geometry, StateKey};
use crate::parsers::qmcfc::{self, InputDeclarations};
use crate::parsers::xyz;
use crate::runner::process::command_line;
use crate::runner::{ProcessRunner, ScratchDir, SystemRunner};

use std::path::{Path, PathBuf};

/// 按名称引用、无需在模板中声明的辅助文件
const AUXILIARY_FILES: [&str; 6] = [
    "intra_nonbonded.dat",
    "guff.dat",
    "moldescriptor.dat",
    "dftb_energy.template",
    "dftb_force.template",
    "dftb_in.template",
];

/// 模板中声明、需要放入工作目录的输入文件
const DECLARED_INPUTS: [&str; 3] = ["start_file", "parameter_file", "topology_file"];

/// 每步计算产生、解析后删除的文件
const STEP_OUTPUTS: [&str; 7] = [
    "result_qmcfc.xyz",
    "result_qmcfc.out",
    "result_qmcfc.info",
    "result_qmcfc.forces",
    "result_qmcfc.en",
    "result_qmcfc.chrg",
    "result_qmcfc.vel",
];

const GEOMETRY_XYZ: &str = "geom.xyz";
const TRAJ_LIST: &str = "traj_list.dat";
const STDOUT_LOG: &str = "result.out";
const STDERR_LOG: &str = "result.err";

/// QMCFC 计算配置
#[derive(Debug, Clone)]
pub struct QmcfcConfig {
    /// 可执行文件路径
    pub executable: String,
    /// QMCFC 输入模板
    pub input_template: PathBuf,
    /// 工作目录根
    pub scratch_root: PathBuf,
    /// 节点编号，工作目录为 `<scratch_root>/<node_id>`
    pub node_id: usize,
    /// 结束后保留工作目录
    pub keep_scratch: bool,
}

/// QMCFC 理论方法
pub struct QmcfcLot {
    executable: String,
    input_name: String,
    info_file: String,
    energy_file: String,
    force_file: String,
    scratch: ScratchDir,
    runner: Box<dyn ProcessRunner>,
}

impl QmcfcLot {
    /// 使用真实进程创建
    pub fn new(config: QmcfcConfig) -> Result<Self> {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// 使用指定的进程调用实现创建
    pub fn with_runner(config: QmcfcConfig, runner: Box<dyn ProcessRunner>) -> Result<Self> {
        let template = &config.input_template;
        let declarations = InputDeclarations::from_file(template)?;

        let info_file = declarations.required("info_file")?;
        let energy_file = declarations.required("energy_file")?;
        let force_file = declarations.required("force_file")?;

        let input_name = template
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                LotError::InvalidArgument(format!("'{}' has no file name", template.display()))
            })?;
        let input_dir = template.parent().unwrap_or_else(|| Path::new("."));

        let scratch = ScratchDir::for_node(&config.scratch_root, config.node_id)?
            .keep(config.keep_scratch);

        for key in DECLARED_INPUTS {
            if let Some(name) = declarations.declared(key) {
                scratch.stage(&input_dir.join(&name))?;
            }
        }
        for name in AUXILIARY_FILES {
            let src = input_dir.join(name);
            if src.is_file() {
                scratch.stage(&src)?;
            } else {
                log::warn!("QMCFC auxiliary file {} not found, not staged", src.display());
            }
        }
        scratch.stage(template)?;
        scratch.write(TRAJ_LIST, &format!("{}\n", GEOMETRY_XYZ))?;

        Ok(QmcfcLot {
            executable: config.executable,
            input_name,
            info_file,
            energy_file,
            force_file,
            scratch,
            runner,
        })
    }

    /// 一步计算：写几何、运行、记录日志、解析
    fn step(&mut self, geom: &Geometry) -> Result<CalculationResult> {
        xyz::write_xyz_file(geom, &self.scratch.join(GEOMETRY_XYZ))?;

        // 防止读取上一步残留的输出
        self.scratch
            .remove_files(&[self.energy_file.as_str(), self.force_file.as_str()])?;

        let args = vec![self.input_name.clone()];
        let output = self
            .runner
            .run(&self.executable, &args, self.scratch.path())?;

        self.scratch.append_log(STDOUT_LOG, "Stdout", &output.stdout)?;
        self.scratch.append_log(STDERR_LOG, "Stderr", &output.stderr)?;
        output.check(&command_line(&self.executable, &args))?;

        let result = qmcfc::parse_output_files(
            &self.scratch.join(&self.info_file),
            &self.scratch.join(&self.energy_file),
            &self.scratch.join(&self.force_file),
            geom.num_atoms(),
        )?;

        let removed = self.scratch.remove_files(&STEP_OUTPUTS)?;
        log::debug!("Removed {} QMCFC step outputs", removed);

        Ok(result)
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// 模板中声明的 (info, energy, force) 文件名
    pub fn output_files(&self) -> (&str, &str, &str) {
        (&self.info_file, &self.energy_file, &self.force_file)
    }
}

impl LevelOfTheory for QmcfcLot {
    fn name(&self) -> &str {
        "QMCFC"
    }

    fn compute(&mut self, geom: &Geometry, key: StateKey) -> Result<CalculationResult> {
        let outcome = self.step(geom);
        self.scratch.set_failed(outcome.is_err());
        let result = outcome?;

        log::info!(
            "QMCFC state {}: E = {:.10} Eh, max |g| = {:.6e}",
            key,
            result.energy(),
            result.max_gradient()
        );

        Ok(result)
    }
}
