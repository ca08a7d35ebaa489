//! 无头后端 - 基于 image crate 的图片实现与虚拟显示器

use super::{ImageImpl, NativeHandle, Platform, ScreenImpl};
use crate::config::DisplayConfig;
use crate::error::{Result, ToolkitError};
use crate::format::{EncodedImage, FormatRegistry};
use crate::geometry::{Position, Size};
use crate::image::CanonicalResource;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// 只读取图片头部获得尺寸
fn read_dimensions(bytes: &[u8]) -> Result<Size> {
    let reader = image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ToolkitError::BackendFailure(e.to_string()))?;
    let (width, height) = reader.into_dimensions()?;
    Ok(Size::new(width, height))
}

fn encode_png(image: &DynamicImage) -> Result<EncodedImage> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageOutputFormat::Png)?;
    let (width, height) = image.dimensions();
    Ok(EncodedImage {
        bytes: buf.into_inner(),
        size: Size::new(width, height),
    })
}

/// 图片实现
#[derive(Debug)]
pub struct RasterImage {
    resource: CanonicalResource,
    format: ImageFormat,
}

impl RasterImage {
    /// 校验字节是可识别的图片格式
    pub fn new(resource: CanonicalResource) -> Result<Self> {
        let format = image::guess_format(resource.bytes())?;
        Ok(Self { resource, format })
    }
}

impl ImageImpl for RasterImage {
    fn size(&self) -> Result<Size> {
        self.resource.size_or_decode(read_dimensions)
    }

    fn data(&self) -> Result<Arc<[u8]>> {
        Ok(self.resource.bytes().clone())
    }

    fn save(&self, path: &Path) -> Result<()> {
        let target = ImageFormat::from_path(path)?;
        if target == self.format {
            // 同格式直接写出原始字节
            return std::fs::write(path, &self.resource.bytes()[..])
                .map_err(|e| ToolkitError::BackendFailure(format!("{}: {}", path.display(), e)));
        }

        let decoded = image::load_from_memory_with_format(self.resource.bytes(), self.format)?;
        decoded.save_with_format(path, target)?;
        Ok(())
    }
}

/// 虚拟显示器
#[derive(Debug, Clone)]
pub struct HeadlessScreen {
    display: DisplayConfig,
}

impl HeadlessScreen {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }
}

impl ScreenImpl for HeadlessScreen {
    fn name(&self) -> String {
        self.display.name.clone()
    }

    fn origin(&self) -> Position {
        Position::new(self.display.x, self.display.y)
    }

    fn size(&self) -> Size {
        Size::new(self.display.width, self.display.height)
    }

    fn image_data(&self) -> Result<Box<dyn ImageImpl>> {
        let frame = RgbaImage::from_pixel(
            self.display.width,
            self.display.height,
            Rgba(self.display.fill),
        );
        let encoded = encode_png(&DynamicImage::ImageRgba8(frame))?;
        let resource = CanonicalResource::with_size(encoded.bytes.into(), encoded.size);
        Ok(Box::new(RasterImage::new(resource)?))
    }
}

/// 无头平台
#[derive(Debug, Clone, Default)]
pub struct HeadlessPlatform {
    displays: Vec<DisplayConfig>,
}

impl HeadlessPlatform {
    pub fn new(displays: Vec<DisplayConfig>) -> Self {
        Self { displays }
    }
}

impl Platform for HeadlessPlatform {
    fn name(&self) -> &str {
        "headless"
    }

    fn create_image(&self, resource: CanonicalResource) -> Result<Box<dyn ImageImpl>> {
        Ok(Box::new(RasterImage::new(resource)?))
    }

    fn create_screen(&self, native: NativeHandle) -> Result<Box<dyn ScreenImpl>> {
        let display = self
            .displays
            .iter()
            .find(|d| d.id == native.0)
            .cloned()
            .ok_or_else(|| {
                ToolkitError::BackendFailure(format!("No display for native handle {}", native.0))
            })?;
        Ok(Box::new(HeadlessScreen::new(display)))
    }

    fn native_screens(&self) -> Vec<NativeHandle> {
        self.displays.iter().map(|d| NativeHandle(d.id)).collect()
    }

    /// 登记 image crate 的图片类型
    fn register_formats(&self, formats: &FormatRegistry) {
        formats.register::<DynamicImage, _, _>(
            |bytes| Ok(image::load_from_memory(bytes)?),
            encode_png,
        );
        formats.register::<RgbaImage, _, _>(
            |bytes| Ok(image::load_from_memory(bytes)?.to_rgba8()),
            |image| encode_png(&DynamicImage::ImageRgba8(image.clone())),
        );
    }
}
