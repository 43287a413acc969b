//! # 统一错误处理模块
//!
//! 定义 qmlot 的所有错误类型，使用 `thiserror` 派生。
//!
//! 解析失败一律立即返回，并携带文件/行号上下文；
//! 不存在"部分结果"，任何一步失败都使整个计算步骤无效。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// qmlot 统一错误类型
#[derive(Error, Debug)]
pub enum LotError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 输出解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Marker '{marker}' not found in {path}")]
    MissingMarker { marker: String, path: String },

    #[error("Expected {expected} data rows in {path}, found {found}")]
    InsufficientRows {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("Malformed row in {path} at line {line}: {reason}")]
    MalformedRow {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Malformed output {path}: {reason}")]
    MalformedOutput { path: String, reason: String },

    #[error("Input file {path} does not declare required key '{key}'")]
    MalformedInputSpec { path: String, key: String },

    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command} (exit code {code:?})\n{stderr}")]
    ProcessFailure {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 结果查询错误
    // ─────────────────────────────────────────────────────────────
    #[error("No result computed for state (multiplicity {multiplicity}, index {state})")]
    StateNotComputed { multiplicity: u32, state: usize },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, LotError>;
