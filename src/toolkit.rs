//! Toolkit - 显式持有的运行上下文
//!
//! 配置、平台工厂、格式能力表、屏幕注册表和诊断接收者都挂在这里，由调用方
//! 创建并传给各构造函数。屏幕注册表随 `Toolkit` 存活，通常即进程生命周期。

use crate::config::ToolkitConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::Result;
use crate::format::{EncodedImage, FormatRegistry};
use crate::platform::{HeadlessPlatform, NativeHandle, Platform};
use crate::registry::IdentityRegistry;
use crate::screen::Screen;
use std::any::Any;
use std::sync::Arc;

pub struct Toolkit {
    config: ToolkitConfig,
    platform: Arc<dyn Platform>,
    formats: Arc<FormatRegistry>,
    screens: IdentityRegistry<NativeHandle, Screen>,
    diagnostics: Arc<dyn Diagnostics>,
}

#[derive(Default)]
pub struct ToolkitBuilder {
    config: Option<ToolkitConfig>,
    platform: Option<Arc<dyn Platform>>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl ToolkitBuilder {
    pub fn config(mut self, config: ToolkitConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn build(self) -> Toolkit {
        let config = self.config.unwrap_or_default();
        let platform = self
            .platform
            .unwrap_or_else(|| Arc::new(HeadlessPlatform::new(config.displays.clone())));
        let diagnostics = self.diagnostics.unwrap_or_else(|| Arc::new(TracingDiagnostics));

        let formats = Arc::new(FormatRegistry::new());
        platform.register_formats(&formats);

        tracing::debug!(app = %config.app_name, platform = platform.name(), "toolkit initialized");
        Toolkit {
            config,
            platform,
            formats,
            screens: IdentityRegistry::new(),
            diagnostics,
        }
    }
}

impl Toolkit {
    pub fn builder() -> ToolkitBuilder {
        ToolkitBuilder::default()
    }

    /// 使用无头后端
    pub fn headless(config: ToolkitConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    pub fn formats(&self) -> &Arc<FormatRegistry> {
        &self.formats
    }

    pub fn diagnostics(&self) -> &dyn Diagnostics {
        self.diagnostics.as_ref()
    }

    /// 集成代码登记额外的外部格式
    pub fn register_format<T, D, E>(&self, decode: D, encode: E)
    where
        T: Any + Send + Sync,
        D: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
        E: Fn(&T) -> Result<EncodedImage> + Send + Sync + 'static,
    {
        self.formats.register::<T, D, E>(decode, encode);
    }

    /// 按原生句柄取屏幕，同一句柄总是返回同一个 `Screen`
    pub fn screen(&self, native: impl Into<NativeHandle>) -> Result<Screen> {
        self.screens.lookup_or_create(native.into(), |native| {
            Screen::bind(&self.platform, &self.formats, *native)
        })
    }

    /// 平台当前报告的全部屏幕
    pub fn screens(&self) -> Result<Vec<Screen>> {
        self.platform
            .native_screens()
            .into_iter()
            .map(|native| self.screen(native))
            .collect()
    }
}
