//! 诊断输出 - 弃用提示等非致命消息
//!
//! 诊断只是旁路通道，不影响调用的控制流和返回值。

/// 诊断接收者
pub trait Diagnostics: Send + Sync {
    /// 报告一次弃用用法
    fn deprecated(&self, message: &str);
}

/// 默认实现：通过 tracing 输出警告
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn deprecated(&self, message: &str) {
        tracing::warn!(target: "mini_toolkit::deprecation", "{}", message);
    }
}
