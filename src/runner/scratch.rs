//! # 临时工作目录
//!
//! 每个计算拥有一个独占的工作目录：创建、放入输入文件、
//! 运行外部程序、读取输出，并在释放时清理。
//! 以下情况释放时保留目录：要求保留、最近一次计算失败、目录在获取前已存在。
//! 所有文件操作都基于显式路径，不修改进程的当前目录。
//!
//! ## 依赖关系
//! - 被 `lot/` 使用
//! - 无外部模块依赖

use crate::error::{LotError, Result};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 独占的计算工作目录
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    keep: bool,
    /// 目录由本对象创建
    created: bool,
    failed: bool,
}

impl ScratchDir {
    /// 创建（或复用）工作目录
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let created = !path.exists();
        fs::create_dir_all(&path).map_err(|e| LotError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        log::info!("Using scratch directory {}", path.display());
        Ok(ScratchDir {
            path,
            keep: false,
            created,
            failed: false,
        })
    }

    /// `<root>/<node_id>` 形式的工作目录
    pub fn for_node(root: &Path, node_id: usize) -> Result<Self> {
        Self::acquire(root.join(node_id.to_string()))
    }

    /// 释放时是否保留目录
    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    /// 记录最近一次计算是否失败；失败的目录在释放时保留以便排查
    pub fn set_failed(&mut self, failed: bool) {
        self.failed = failed;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// 以原文件名复制到工作目录
    pub fn stage(&self, src: &Path) -> Result<PathBuf> {
        let name = src.file_name().ok_or_else(|| {
            LotError::InvalidArgument(format!("'{}' has no file name", src.display()))
        })?;
        self.stage_as(src, &name.to_string_lossy())
    }

    /// 以指定文件名复制到工作目录
    pub fn stage_as(&self, src: &Path, name: &str) -> Result<PathBuf> {
        if !src.is_file() {
            return Err(LotError::FileNotFound {
                path: src.display().to_string(),
            });
        }
        let dest = self.join(name);
        fs::copy(src, &dest).map_err(|e| LotError::FileWriteError {
            path: dest.display().to_string(),
            source: e,
        })?;
        log::debug!("Staged {} -> {}", src.display(), dest.display());
        Ok(dest)
    }

    /// 写入文本文件（覆盖）
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let dest = self.join(name);
        fs::write(&dest, content).map_err(|e| LotError::FileWriteError {
            path: dest.display().to_string(),
            source: e,
        })?;
        Ok(dest)
    }

    /// 读取工作目录中的文本文件
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.join(name);
        if !path.exists() {
            return Err(LotError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        fs::read_to_string(&path).map_err(|e| LotError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 以 "<header>:" 段落形式追加到日志文件
    pub fn append_log(&self, name: &str, header: &str, body: &str) -> Result<()> {
        let path = self.join(name);
        let write_err = |e: std::io::Error| LotError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_err)?;
        writeln!(file, "{}:", header).map_err(write_err)?;
        writeln!(file, "{}", body).map_err(write_err)?;
        Ok(())
    }

    /// 删除存在的文件，返回删除数量
    pub fn remove_files(&self, names: &[&str]) -> Result<usize> {
        let mut removed = 0;
        for name in names {
            let path = self.join(name);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| LotError::FileWriteError {
                    path: path.display().to_string(),
                    source: e,
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.keep {
            log::info!("Keeping scratch directory {}", self.path.display());
            return;
        }
        if self.failed {
            log::warn!(
                "Last calculation failed, keeping scratch directory {}",
                self.path.display()
            );
            return;
        }
        if !self.created {
            log::info!(
                "Scratch directory {} existed before this run, not removed",
                self.path.display()
            );
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path) {
            log::warn!(
                "Failed to remove scratch directory {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
