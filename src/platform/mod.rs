//! 平台接入层
//!
//! 公开句柄只依赖这里的能力集合；具体后端在构造 `Toolkit` 时注入，测试可以
//! 用替身实现同一组 trait 而不改动接口侧代码。

use crate::error::Result;
use crate::format::FormatRegistry;
use crate::geometry::{Position, Size};
use crate::image::CanonicalResource;
use std::path::Path;
use std::sync::Arc;

pub mod headless;

pub use headless::{HeadlessPlatform, HeadlessScreen, RasterImage};

/// 宿主平台提供的不透明原生标识（如显示器 ID），按值比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub u64);

impl From<u64> for NativeHandle {
    fn from(id: u64) -> Self {
        NativeHandle(id)
    }
}

/// 图片后端能力集合
pub trait ImageImpl: Send + Sync {
    /// 解码后的尺寸，最多解码一次
    fn size(&self) -> Result<Size>;

    /// 规范化原始字节
    fn data(&self) -> Result<Arc<[u8]>>;

    /// 编码并写入目标路径；不负责创建父目录
    fn save(&self, path: &Path) -> Result<()>;
}

/// 屏幕后端能力集合
pub trait ScreenImpl: Send + Sync {
    fn name(&self) -> String;
    fn origin(&self) -> Position;
    fn size(&self) -> Size;

    /// 截取当前屏幕内容，返回已绑定好的图片实现
    fn image_data(&self) -> Result<Box<dyn ImageImpl>>;
}

/// 平台工厂：为公开句柄提供具体实现
pub trait Platform: Send + Sync {
    fn name(&self) -> &str;

    fn create_image(&self, resource: CanonicalResource) -> Result<Box<dyn ImageImpl>>;

    fn create_screen(&self, native: NativeHandle) -> Result<Box<dyn ScreenImpl>>;

    /// 当前可用的显示器句柄
    fn native_screens(&self) -> Vec<NativeHandle> {
        Vec::new()
    }

    /// 后端在此登记自己支持的外部格式
    fn register_formats(&self, _formats: &FormatRegistry) {}
}
