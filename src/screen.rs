//! Screen - 显示器句柄
//!
//! 只能通过 `Toolkit::screen` 获得；同一原生句柄总是得到同一个 `Screen`。

use crate::binding::Binding;
use crate::error::Result;
use crate::format::FormatRegistry;
use crate::geometry::{Position, Size};
use crate::image::{CanonicalSource, Image};
use crate::platform::{NativeHandle, Platform, ScreenImpl};
use std::fmt;
use std::sync::Arc;

pub struct ScreenState {
    native: NativeHandle,
    platform: Arc<dyn Platform>,
    formats: Arc<FormatRegistry>,
}

pub type ScreenBinding = Binding<ScreenState, dyn ScreenImpl>;

#[derive(Clone)]
pub struct Screen {
    binding: Arc<ScreenBinding>,
}

impl Screen {
    pub(crate) fn bind(
        platform: &Arc<dyn Platform>,
        formats: &Arc<FormatRegistry>,
        native: NativeHandle,
    ) -> Result<Self> {
        let imp = platform.create_screen(native)?;
        let state = ScreenState {
            native,
            platform: platform.clone(),
            formats: formats.clone(),
        };
        Ok(Self {
            binding: Binding::create(state, imp),
        })
    }

    pub fn binding(&self) -> &Arc<ScreenBinding> {
        &self.binding
    }

    pub fn native(&self) -> NativeHandle {
        self.binding.interface().native
    }

    pub fn name(&self) -> String {
        self.binding.imp().name()
    }

    pub fn origin(&self) -> Position {
        self.binding.imp().origin()
    }

    pub fn size(&self) -> Size {
        self.binding.imp().size()
    }

    /// 截屏；后端返回的实现以预绑定来源接入
    pub fn as_image(&self) -> Result<Image> {
        let imp = self.binding.imp().image_data()?;
        let state = self.binding.interface();
        Image::bind(
            state.platform.as_ref(),
            &state.formats,
            CanonicalSource::PreboundImpl(imp),
        )
    }

    pub fn ptr_eq(&self, other: &Screen) -> bool {
        Arc::ptr_eq(&self.binding, &other.binding)
    }
}

impl PartialEq for Screen {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Screen {}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen").field("native", &self.native()).finish_non_exhaustive()
    }
}
