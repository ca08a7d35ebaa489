//! 错误类型

use std::path::PathBuf;
use thiserror::Error;

/// 工具包错误
#[derive(Error, Debug)]
pub enum ToolkitError {
    /// 构造参数缺失、重复或格式错误
    #[error("{0}")]
    InvalidArgument(String),

    /// 引用的文件不存在（携带完整路径）
    #[error("{}", .0.display())]
    ResourceNotFound(PathBuf),

    /// 无法识别的来源类型或转换目标
    #[error("{0}")]
    UnsupportedType(String),

    /// 后端实现原样抛出的失败
    #[error("Backend failure: {0}")]
    BackendFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<image::ImageError> for ToolkitError {
    fn from(err: image::ImageError) -> Self {
        ToolkitError::BackendFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ToolkitError {
    fn from(err: serde_json::Error) -> Self {
        ToolkitError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ToolkitError>;
