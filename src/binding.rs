//! 接口/实现绑定
//!
//! 公开句柄只持有领域状态和一个由平台注入的实现对象；实现侧通过弱引用
//! 回指接口。两者在同一次分配中创建、同时销毁。

use std::ops::Deref;
use std::sync::{Arc, Weak};

/// 接口与实现的配对
pub struct Binding<D, B: ?Sized> {
    interface: D,
    imp: Bound<D, B>,
}

/// 绑定中的实现侧，可解引用为后端对象
pub struct Bound<D, B: ?Sized> {
    interface: Weak<Binding<D, B>>,
    inner: Box<B>,
}

impl<D, B: ?Sized> Binding<D, B> {
    /// 用已构造好的实现对象建立绑定
    pub fn create(interface: D, imp: Box<B>) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            interface,
            imp: Bound {
                interface: weak.clone(),
                inner: imp,
            },
        })
    }

    pub fn interface(&self) -> &D {
        &self.interface
    }

    pub fn imp(&self) -> &Bound<D, B> {
        &self.imp
    }
}

impl<D, B: ?Sized> Bound<D, B> {
    /// 回到接口侧；绑定存活期间总是 Some
    pub fn interface(&self) -> Option<Arc<Binding<D, B>>> {
        self.interface.upgrade()
    }
}

impl<D, B: ?Sized> Deref for Bound<D, B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.inner
    }
}
