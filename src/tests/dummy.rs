//! 测试替身：记录动作的平台实现、记录诊断的接收者、图片夹具

use crate::diagnostics::Diagnostics;
use crate::error::{Result, ToolkitError};
use crate::geometry::{Position, Size};
use crate::image::CanonicalResource;
use crate::platform::{ImageImpl, NativeHandle, Platform, ScreenImpl};
use crate::{DisplayConfig, Toolkit, ToolkitConfig};
use ::image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// 生成 PNG 字节
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let frame = RgbaImage::from_pixel(width, height, Rgba([0x33, 0x66, 0x99, 0xFF]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(frame)
        .write_to(&mut buf, ImageOutputFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// 记录所有弃用提示
#[derive(Default)]
pub struct RecordingDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn deprecated(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// 动作日志
#[derive(Default, Clone)]
pub struct ActionLog {
    actions: Arc<Mutex<Vec<String>>>,
}

impl ActionLog {
    pub fn record(&self, action: impl Into<String>) {
        self.actions.lock().unwrap().push(action.into());
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    pub fn contains(&self, action: &str) -> bool {
        self.actions.lock().unwrap().iter().any(|a| a == action)
    }
}

pub struct DummyImage {
    resource: CanonicalResource,
    log: ActionLog,
    decodes: Arc<AtomicUsize>,
}

impl DummyImage {
    pub fn new(bytes: Vec<u8>, log: ActionLog) -> Self {
        Self {
            resource: CanonicalResource::new(bytes.into()),
            log,
            decodes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ImageImpl for DummyImage {
    fn size(&self) -> Result<Size> {
        self.resource.size_or_decode(|bytes| {
            self.decodes.fetch_add(1, Ordering::SeqCst);
            let (width, height) = ::image::load_from_memory(bytes)?.to_rgba8().dimensions();
            Ok(Size::new(width, height))
        })
    }

    fn data(&self) -> Result<Arc<[u8]>> {
        Ok(self.resource.bytes().clone())
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.log.record(format!("save {}", path.display()));
        Ok(())
    }
}

pub struct DummyScreen {
    native: NativeHandle,
    captures: AtomicUsize,
    log: ActionLog,
}

impl ScreenImpl for DummyScreen {
    fn name(&self) -> String {
        format!(
            "Dummy Screen {} ({} captures)",
            self.native.0,
            self.captures.load(Ordering::SeqCst)
        )
    }

    fn origin(&self) -> Position {
        Position::new(self.native.0 as i32 * 1920, 0)
    }

    fn size(&self) -> Size {
        Size::new(1920, 1080)
    }

    fn image_data(&self) -> Result<Box<dyn ImageImpl>> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        self.log.record(format!("capture screen {}", self.native.0));
        Ok(Box::new(DummyImage::new(png_bytes(16, 9), self.log.clone())))
    }
}

/// 记录动作的替身平台
#[derive(Default)]
pub struct DummyPlatform {
    pub log: ActionLog,
    pub decodes: Arc<AtomicUsize>,
    pub screens_created: AtomicUsize,
    /// 这些句柄创建屏幕时失败
    pub broken_handles: Vec<u64>,
}

impl Platform for DummyPlatform {
    fn name(&self) -> &str {
        "dummy"
    }

    fn create_image(&self, resource: CanonicalResource) -> Result<Box<dyn ImageImpl>> {
        match resource.path() {
            Some(path) => self.log.record(format!("load image file {}", path.display())),
            None => self.log.record(format!("load image data {} bytes", resource.bytes().len())),
        }
        Ok(Box::new(DummyImage {
            resource,
            log: self.log.clone(),
            decodes: self.decodes.clone(),
        }))
    }

    fn create_screen(&self, native: NativeHandle) -> Result<Box<dyn ScreenImpl>> {
        if self.broken_handles.contains(&native.0) {
            return Err(ToolkitError::BackendFailure(format!("display {} unplugged", native.0)));
        }
        self.screens_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(DummyScreen {
            native,
            captures: AtomicUsize::new(0),
            log: self.log.clone(),
        }))
    }

    fn native_screens(&self) -> Vec<NativeHandle> {
        vec![NativeHandle(0), NativeHandle(1)]
    }
}

/// 测试夹具：临时资源目录 + 32x32 图片
pub struct Fixture {
    dir: TempDir,
    pub root: PathBuf,
    pub absolute: PathBuf,
    pub relative: PathBuf,
    pub bytes: Vec<u8>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("resources");
        std::fs::create_dir_all(root.join("images")).unwrap();

        let relative = PathBuf::from("images/icon.png");
        let absolute = root.join(&relative);
        let bytes = png_bytes(32, 32);
        std::fs::write(&absolute, &bytes).unwrap();

        Self {
            dir,
            root,
            absolute,
            relative,
            bytes,
            diagnostics: Arc::new(RecordingDiagnostics::default()),
        }
    }

    pub fn config(&self) -> ToolkitConfig {
        ToolkitConfig::default()
            .with_resource_root(&self.root)
            .with_display(DisplayConfig {
                id: 1,
                name: "Built-in Display".to_string(),
                x: 0,
                y: 0,
                width: 64,
                height: 48,
                fill: [0, 0, 0, 0xFF],
            })
            .with_display(DisplayConfig {
                id: 2,
                name: "External Display".to_string(),
                x: 64,
                y: -10,
                width: 80,
                height: 60,
                fill: [0xFF, 0xFF, 0xFF, 0xFF],
            })
    }

    /// 无头后端
    pub fn toolkit(&self) -> Toolkit {
        Toolkit::builder()
            .config(self.config())
            .diagnostics(self.diagnostics.clone())
            .build()
    }

    /// 替身后端
    pub fn dummy_toolkit(&self, platform: Arc<DummyPlatform>) -> Toolkit {
        Toolkit::builder()
            .config(self.config())
            .platform(platform)
            .diagnostics(self.diagnostics.clone())
            .build()
    }

    pub fn temp_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
