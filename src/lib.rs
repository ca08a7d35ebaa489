//! Mini Toolkit - 跨平台 UI 工具包的资源绑定层
//! 负责图片来源规范化、外部格式转换、原生句柄到包装对象的身份映射

pub mod error;
pub mod config;
pub mod diagnostics;
mod geometry;

pub use config::{DisplayConfig, ToolkitConfig};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{Result, ToolkitError};
pub use geometry::{Position, Size};

// 接口/实现绑定与身份注册表
pub mod binding;
pub mod registry;

// 外部格式能力表
pub mod format;

// 平台后端
pub mod platform;

// 公开句柄
pub mod image;
pub mod screen;

mod toolkit;
pub use toolkit::{Toolkit, ToolkitBuilder};

pub use format::{ForeignObject, FormatRegistry, FormatTag};
pub use image::{Image, ImageArgs, SourceValue};
pub use platform::NativeHandle;
pub use screen::Screen;

// 单元测试
#[cfg(test)]
mod tests;
