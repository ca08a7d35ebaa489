//! 构造参数解析
//!
//! 各种形态的构造输入在这里一次性归一为 `CanonicalSource`，下游只对这个
//! 枚举做穷尽匹配，不再检查输入类型。

use crate::config::ToolkitConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, ToolkitError};
use crate::format::ForeignObject;
use crate::platform::ImageImpl;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// 构造参数的取值形态
#[derive(Debug, Clone)]
pub enum SourceValue {
    /// 字符串路径
    Text(String),
    /// 结构化路径
    Path(PathBuf),
    /// 可变字节缓冲
    Buffer(Vec<u8>),
    /// 只读字节视图
    Bytes(Arc<[u8]>),
    /// 第三方图片对象
    Foreign(ForeignObject),
    /// 无法识别的值，保留类型名用于报错
    Other(&'static str),
}

impl SourceValue {
    /// 用任意不支持的值构造（保留其类型名）
    pub fn other<T>(_value: T) -> Self {
        SourceValue::Other(std::any::type_name::<T>())
    }

    pub fn foreign<T: std::any::Any + Send + Sync>(value: T) -> Self {
        SourceValue::Foreign(ForeignObject::new(value))
    }
}

impl From<&str> for SourceValue {
    fn from(s: &str) -> Self {
        SourceValue::Text(s.to_string())
    }
}

impl From<String> for SourceValue {
    fn from(s: String) -> Self {
        SourceValue::Text(s)
    }
}

impl From<PathBuf> for SourceValue {
    fn from(p: PathBuf) -> Self {
        SourceValue::Path(p)
    }
}

impl From<&std::path::Path> for SourceValue {
    fn from(p: &std::path::Path) -> Self {
        SourceValue::Path(p.to_path_buf())
    }
}

impl From<Vec<u8>> for SourceValue {
    fn from(b: Vec<u8>) -> Self {
        SourceValue::Buffer(b)
    }
}

impl From<&[u8]> for SourceValue {
    fn from(b: &[u8]) -> Self {
        SourceValue::Bytes(b.into())
    }
}

impl From<Arc<[u8]>> for SourceValue {
    fn from(b: Arc<[u8]>) -> Self {
        SourceValue::Bytes(b)
    }
}

impl From<ForeignObject> for SourceValue {
    fn from(f: ForeignObject) -> Self {
        SourceValue::Foreign(f)
    }
}

impl From<i32> for SourceValue {
    fn from(v: i32) -> Self {
        SourceValue::other(v)
    }
}

impl From<f64> for SourceValue {
    fn from(v: f64) -> Self {
        SourceValue::other(v)
    }
}

/// 图片构造参数：一个位置参数，或关键字 `src` / `path`（弃用）/ `data`（弃用）
#[derive(Debug, Clone, Default)]
pub struct ImageArgs {
    pub positional: Option<SourceValue>,
    pub src: Option<SourceValue>,
    pub path: Option<SourceValue>,
    pub data: Option<SourceValue>,
}

impl ImageArgs {
    pub fn new(value: impl Into<SourceValue>) -> Self {
        Self {
            positional: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn with_positional(mut self, value: impl Into<SourceValue>) -> Self {
        self.positional = Some(value.into());
        self
    }

    pub fn with_src(mut self, value: impl Into<SourceValue>) -> Self {
        self.src = Some(value.into());
        self
    }

    /// 已弃用：等同于位置参数
    pub fn with_path(mut self, value: impl Into<SourceValue>) -> Self {
        self.path = Some(value.into());
        self
    }

    /// 已弃用：等同于位置参数
    pub fn with_data(mut self, value: impl Into<SourceValue>) -> Self {
        self.data = Some(value.into());
        self
    }
}

/// 规范化后的唯一来源
pub enum CanonicalSource {
    FilePath(PathBuf),
    ByteBuffer(Arc<[u8]>),
    ForeignObject(ForeignObject),
    /// 仅供内部重建使用（如后端产生的截图）
    PreboundImpl(Box<dyn ImageImpl>),
}

impl fmt::Debug for CanonicalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalSource::FilePath(p) => f.debug_tuple("FilePath").field(p).finish(),
            CanonicalSource::ByteBuffer(b) => write!(f, "ByteBuffer({} bytes)", b.len()),
            CanonicalSource::ForeignObject(o) => f.debug_tuple("ForeignObject").field(o).finish(),
            CanonicalSource::PreboundImpl(_) => f.write_str("PreboundImpl"),
        }
    }
}

/// 将构造参数解析为唯一的规范化来源
pub fn resolve(
    args: ImageArgs,
    config: &ToolkitConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<CanonicalSource> {
    let ImageArgs { positional, src, path, data } = args;

    let deprecated: Vec<&str> = [("path", path.is_some()), ("data", data.is_some())]
        .iter()
        .filter(|(_, used)| *used)
        .map(|(name, _)| *name)
        .collect();
    if !deprecated.is_empty() {
        diagnostics.deprecated(&format!(
            "Image: the {} argument{} deprecated; pass the source positionally or as `src`.",
            deprecated.iter().map(|n| format!("`{}`", n)).collect::<Vec<_>>().join(" and "),
            if deprecated.len() > 1 { "s are" } else { " is" },
        ));
    }

    let mut supplied: Vec<SourceValue> = [positional, src, path, data].into_iter().flatten().collect();
    let value = match supplied.len() {
        0 => {
            return Err(ToolkitError::InvalidArgument(
                "No image source supplied.".to_string(),
            ))
        }
        1 => supplied.remove(0),
        _ => {
            return Err(ToolkitError::InvalidArgument(
                "Received multiple arguments to constructor.".to_string(),
            ))
        }
    };

    classify(value, config)
}

/// 按取值形态分类
fn classify(value: SourceValue, config: &ToolkitConfig) -> Result<CanonicalSource> {
    match value {
        SourceValue::Text(s) => resolve_path(PathBuf::from(s), config),
        SourceValue::Path(p) => resolve_path(p, config),
        SourceValue::Buffer(b) => Ok(CanonicalSource::ByteBuffer(b.into())),
        SourceValue::Bytes(b) => Ok(CanonicalSource::ByteBuffer(b)),
        SourceValue::Foreign(obj) => Ok(CanonicalSource::ForeignObject(obj)),
        SourceValue::Other(type_name) => Err(ToolkitError::UnsupportedType(format!(
            "Unsupported source type for Image: {}",
            type_name
        ))),
    }
}

fn resolve_path(path: PathBuf, config: &ToolkitConfig) -> Result<CanonicalSource> {
    let full = config.resolve_resource(&path)?;
    if !full.is_file() {
        return Err(ToolkitError::ResourceNotFound(full));
    }
    Ok(CanonicalSource::FilePath(full))
}
