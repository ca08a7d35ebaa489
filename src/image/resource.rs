//! 规范化资源：不可变原始字节 + 惰性解码的元数据

use crate::error::Result;
use crate::geometry::Size;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 构造完成后不再修改，可在线程间直接共享
#[derive(Debug)]
pub struct CanonicalResource {
    bytes: Arc<[u8]>,
    path: Option<PathBuf>,
    size: OnceCell<Size>,
}

impl CanonicalResource {
    pub fn new(bytes: Arc<[u8]>) -> Self {
        Self {
            bytes,
            path: None,
            size: OnceCell::new(),
        }
    }

    /// 从文件读出的资源，记录完整路径
    pub fn from_file(path: PathBuf, bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
            path: Some(path),
            size: OnceCell::new(),
        }
    }

    /// 尺寸已知（例如由外部对象编码而来）时直接填充元数据
    pub fn with_size(bytes: Arc<[u8]>, size: Size) -> Self {
        Self {
            bytes,
            path: None,
            size: OnceCell::with_value(size),
        }
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 取尺寸；首次调用时用 decode 解码并缓存，之后不再解码
    pub fn size_or_decode<F>(&self, decode: F) -> Result<Size>
    where
        F: FnOnce(&[u8]) -> Result<Size>,
    {
        self.size.get_or_try_init(|| decode(&self.bytes)).copied()
    }
}
