//! # 外部进程调用
//!
//! 以 `ProcessRunner` 能力接口抽象外部程序的调用，
//! 测试中可替换为返回预置输出的实现，而无需真实的 `dftb+` / `qmcfc`。
//!
//! ## 依赖关系
//! - 被 `lot/` 使用
//! - 无外部模块依赖

use crate::error::{LotError, Result};

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

/// 外部进程的输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// 退出码；被信号终止时为 None
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// 非零退出时转换为 ProcessFailure
    pub fn check(self, command: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(LotError::ProcessFailure {
                command: command.to_string(),
                code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// 运行外部程序的能力
pub trait ProcessRunner {
    /// 在 `cwd` 中运行 `program args...` 并等待其结束
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput>;
}

/// 通过 `std::process::Command` 调用真实程序
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ProcessOutput> {
        log::debug!("Running '{} {}' in {}", program, args.join(" "), cwd.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => LotError::CommandNotFound {
                    command: program.to_string(),
                },
                _ => LotError::ProcessFailure {
                    command: program.to_string(),
                    code: None,
                    stderr: e.to_string(),
                },
            })?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        })
    }
}

/// 拼接用于日志与错误信息的命令行
pub fn command_line(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_failure_carries_stderr() {
        let out = ProcessOutput {
            stdout: String::new(),
            stderr: "SCC is NOT converged".to_string(),
            exit_code: Some(1),
        };
        match out.check("dftb+").unwrap_err() {
            LotError::ProcessFailure {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "dftb+");
                assert_eq!(code, Some(1));
                assert!(stderr.contains("NOT converged"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_signal_is_failure() {
        let out = ProcessOutput {
            exit_code: None,
            ..Default::default()
        };
        assert!(!out.success());
    }

    #[test]
    fn test_missing_program_is_command_not_found() {
        let dir = std::env::temp_dir();
        let err = SystemRunner
            .run("qmlot-definitely-not-installed", &[], &dir)
            .unwrap_err();
        assert!(matches!(err, LotError::CommandNotFound { .. }));
    }

    #[test]
    fn test_command_line() {
        assert_eq!(command_line("dftb+", &[]), "dftb+");
        assert_eq!(
            command_line("qmcfc", &["run-01.in".to_string()]),
            "qmcfc run-01.in"
        );
    }
}
