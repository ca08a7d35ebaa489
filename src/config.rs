//! 工具包配置结构体

use crate::error::Result;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// 工具包配置（JSON，camelCase 键）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolkitConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// 相对路径的解析根目录
    #[serde(default = "default_resource_root")]
    pub resource_root: PathBuf,
    /// 无头后端使用的显示器列表
    #[serde(default)]
    pub displays: Vec<DisplayConfig>,
}

fn default_app_name() -> String { "Mini Toolkit".to_string() }
fn default_resource_root() -> PathBuf { PathBuf::from("resources") }

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            resource_root: default_resource_root(),
            displays: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    pub id: u64,
    #[serde(default = "default_display_name")]
    pub name: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// 截屏填充色 RGBA
    #[serde(default = "default_fill")]
    pub fill: [u8; 4],
}

fn default_display_name() -> String { "Headless Screen".to_string() }
fn default_fill() -> [u8; 4] { [0xFF, 0xFF, 0xFF, 0xFF] }

impl ToolkitConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从 JSON 文件加载配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = root.into();
        self
    }

    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.displays.push(display);
        self
    }

    pub fn display(&self, id: u64) -> Option<&DisplayConfig> {
        self.displays.iter().find(|d| d.id == id)
    }

    /// 将路径解析为完整路径：相对路径基于资源根目录。
    /// 只做词法规范化，不跟随符号链接，也不检查文件是否存在。
    pub fn resolve_resource(&self, path: &Path) -> Result<PathBuf> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else if self.resource_root.is_absolute() {
            self.resource_root.join(path)
        } else {
            std::env::current_dir()?.join(&self.resource_root).join(path)
        };
        Ok(normalize(&joined))
    }
}

/// 词法规范化：去掉 `.`，`..` 弹出前一段（不会越过根目录）
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
