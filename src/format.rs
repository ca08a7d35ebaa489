//! 外部格式能力表
//!
//! 第三方图片类型通过注册 (decode, encode) 对接入，转换逻辑只按类型标签
//! 查表，不针对任何具体类型做特殊处理。

use crate::error::{Result, ToolkitError};
use crate::geometry::Size;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

/// 类型标签：按 TypeId 比较，保留类型名用于错误信息
#[derive(Clone, Copy)]
pub struct FormatTag {
    id: TypeId,
    name: &'static str,
}

impl FormatTag {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for FormatTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FormatTag {}

impl Hash for FormatTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 类型擦除后的外部对象
pub type ForeignValue = Box<dyn Any + Send + Sync>;

/// 外部对象编码结果：原始字节 + 尺寸元数据
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub size: Size,
}

/// 作为构造来源传入的第三方图片对象
#[derive(Clone)]
pub struct ForeignObject {
    tag: FormatTag,
    value: Arc<dyn Any + Send + Sync>,
}

impl ForeignObject {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            tag: FormatTag::of::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn tag(&self) -> FormatTag {
        self.tag
    }

    pub fn value(&self) -> &(dyn Any + Send + Sync) {
        &*self.value
    }
}

impl fmt::Debug for ForeignObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignObject").field("tag", &self.tag).finish()
    }
}

type DecodeFn = Box<dyn Fn(&[u8]) -> Result<ForeignValue> + Send + Sync>;
type EncodeFn = Box<dyn Fn(&(dyn Any + Send + Sync)) -> Result<EncodedImage> + Send + Sync>;

/// 能力表条目
pub struct FormatEntry {
    tag: FormatTag,
    decode: DecodeFn,
    encode: EncodeFn,
}

impl FormatEntry {
    pub fn tag(&self) -> FormatTag {
        self.tag
    }

    /// 原始字节 → 外部对象
    pub fn decode(&self, bytes: &[u8]) -> Result<ForeignValue> {
        (self.decode)(bytes)
    }

    /// 外部对象 → 原始字节 + 尺寸
    pub fn encode(&self, value: &(dyn Any + Send + Sync)) -> Result<EncodedImage> {
        (self.encode)(value)
    }
}

/// 能力表
#[derive(Default)]
pub struct FormatRegistry {
    entries: RwLock<HashMap<FormatTag, Arc<FormatEntry>>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册外部类型 T；重复注册时覆盖旧条目
    pub fn register<T, D, E>(&self, decode: D, encode: E)
    where
        T: Any + Send + Sync,
        D: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
        E: Fn(&T) -> Result<EncodedImage> + Send + Sync + 'static,
    {
        let tag = FormatTag::of::<T>();
        let entry = FormatEntry {
            tag,
            decode: Box::new(move |bytes: &[u8]| decode(bytes).map(|v| Box::new(v) as ForeignValue)),
            encode: Box::new(move |value: &(dyn Any + Send + Sync)| {
                let value = value.downcast_ref::<T>().ok_or_else(|| {
                    ToolkitError::UnsupportedType(format!(
                        "Unsupported source type for Image: {}",
                        tag
                    ))
                })?;
                encode(value)
            }),
        };

        tracing::debug!(format = tag.name(), "foreign format registered");
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(tag, Arc::new(entry));
    }

    pub fn lookup(&self, tag: &FormatTag) -> Option<Arc<FormatEntry>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(tag).cloned()
    }

    pub fn contains(&self, tag: &FormatTag) -> bool {
        self.lookup(tag).is_some()
    }
}
