//! Image - 平台无关的图片句柄
//!
//! 构造流程：参数 → `source::resolve` → `CanonicalSource` → 平台实现 → 绑定。

mod resource;
pub mod source;

pub use resource::CanonicalResource;
pub use source::{CanonicalSource, ImageArgs, SourceValue};

use crate::binding::Binding;
use crate::error::{Result, ToolkitError};
use crate::format::{FormatRegistry, FormatTag, ForeignValue};
use crate::geometry::Size;
use crate::platform::{ImageImpl, Platform};
use crate::toolkit::Toolkit;
use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 接口侧的领域状态
pub struct ImageState {
    path: Option<PathBuf>,
    formats: Arc<FormatRegistry>,
}

pub type ImageBinding = Binding<ImageState, dyn ImageImpl>;

/// 图片句柄；克隆共享同一个绑定
#[derive(Clone)]
pub struct Image {
    binding: Arc<ImageBinding>,
}

impl Image {
    /// 从构造参数创建图片
    pub fn new(toolkit: &Toolkit, args: ImageArgs) -> Result<Self> {
        let source = source::resolve(args, toolkit.config(), toolkit.diagnostics())?;
        Self::bind(toolkit.platform(), toolkit.formats(), source)
    }

    /// 等同于只给一个位置参数
    pub fn open(toolkit: &Toolkit, src: impl Into<SourceValue>) -> Result<Self> {
        Self::new(toolkit, ImageArgs::new(src))
    }

    /// 为规范化来源创建平台实现并建立绑定
    pub fn bind(
        platform: &dyn Platform,
        formats: &Arc<FormatRegistry>,
        source: CanonicalSource,
    ) -> Result<Self> {
        tracing::debug!(?source, platform = platform.name(), "binding image");
        match source {
            CanonicalSource::FilePath(path) => {
                let bytes = std::fs::read(&path)?;
                let resource = CanonicalResource::from_file(path.clone(), bytes);
                let imp = platform.create_image(resource)?;
                Ok(Self::attach(imp, Some(path), formats))
            }
            CanonicalSource::ByteBuffer(bytes) => {
                let imp = platform.create_image(CanonicalResource::new(bytes))?;
                Ok(Self::attach(imp, None, formats))
            }
            CanonicalSource::ForeignObject(obj) => {
                let entry = formats.lookup(&obj.tag()).ok_or_else(|| {
                    ToolkitError::UnsupportedType(format!(
                        "Unsupported source type for Image: {}",
                        obj.tag()
                    ))
                })?;
                let encoded = entry.encode(obj.value())?;
                let resource = CanonicalResource::with_size(encoded.bytes.into(), encoded.size);
                let imp = platform.create_image(resource)?;
                Ok(Self::attach(imp, None, formats))
            }
            CanonicalSource::PreboundImpl(imp) => Ok(Self::attach(imp, None, formats)),
        }
    }

    fn attach(imp: Box<dyn ImageImpl>, path: Option<PathBuf>, formats: &Arc<FormatRegistry>) -> Self {
        let state = ImageState {
            path,
            formats: formats.clone(),
        };
        Self {
            binding: Binding::create(state, imp),
        }
    }

    /// 从实现侧回指的绑定重建句柄
    pub fn from_binding(binding: Arc<ImageBinding>) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &Arc<ImageBinding> {
        &self.binding
    }

    /// 从文件构造时的完整路径
    pub fn path(&self) -> Option<&Path> {
        self.binding.interface().path.as_deref()
    }

    pub fn size(&self) -> Result<Size> {
        self.binding.imp().size()
    }

    pub fn width(&self) -> Result<u32> {
        Ok(self.size()?.width)
    }

    pub fn height(&self) -> Result<u32> {
        Ok(self.size()?.height)
    }

    /// 原始字节，与来源逐字节一致
    pub fn data(&self) -> Result<Arc<[u8]>> {
        self.binding.imp().data()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.binding.imp().save(path.as_ref())
    }

    /// 转换为目标类型。目标是 `Image` 时返回同一个句柄。
    pub fn as_format<T: Any + Send + Sync>(&self) -> Result<T> {
        let tag = FormatTag::of::<T>();
        let converted = self.convert(Some(tag))?;
        converted.downcast::<T>().map(|value| *value).map_err(|_| {
            ToolkitError::UnsupportedType(format!("Unknown conversion format for Image: {}", tag))
        })
    }

    /// 类型擦除的转换入口；`None` 视为未知格式
    pub fn convert(&self, target: Option<FormatTag>) -> Result<ForeignValue> {
        let tag = target.ok_or_else(|| {
            ToolkitError::UnsupportedType("Unknown conversion format for Image: None".to_string())
        })?;

        if tag.is::<Image>() {
            return Ok(Box::new(self.clone()));
        }

        let entry = self.binding.interface().formats.lookup(&tag).ok_or_else(|| {
            ToolkitError::UnsupportedType(format!("Unknown conversion format for Image: {}", tag))
        })?;
        let data = self.data()?;
        entry.decode(&data)
    }

    /// 是否为同一个绑定
    pub fn ptr_eq(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.binding, &other.binding)
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Image {}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image").field("path", &self.path()).finish_non_exhaustive()
    }
}
