//! 原生句柄 → 包装对象 的身份注册表
//!
//! 同一个原生句柄（按值比较）只会对应一个包装对象。条目在注册表存活期间
//! 永不移除：原生句柄被视为在进程生命周期内有效，没有淘汰策略。

use crate::error::Result;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

pub struct IdentityRegistry<K, V> {
    slots: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> IdentityRegistry<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self { slots: Mutex::new(HashMap::new()) }
    }

    /// 查找已有条目，不存在时调用 factory 创建并登记。
    ///
    /// 同一句柄的并发调用在该句柄的槽位上串行，factory 最多成功执行一次；
    /// 不同句柄互不阻塞。factory 失败时不留下条目，下次调用会重试。
    pub fn lookup_or_create<F>(&self, key: K, factory: F) -> Result<V>
    where
        F: FnOnce(&K) -> Result<V>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            slots.entry(key.clone()).or_default().clone()
        };

        if let Some(existing) = slot.get() {
            tracing::debug!(?key, "identity registry hit");
            return Ok(existing.clone());
        }

        let created = slot.get_or_try_init(|| {
            tracing::debug!(?key, "identity registry miss, creating binding");
            factory(&key)
        });
        match created {
            Ok(value) => Ok(value.clone()),
            Err(err) => {
                self.discard_empty(&key, &slot);
                Err(err)
            }
        }
    }

    /// 移除创建失败的空槽位；仍有其他调用方持有该槽位时保留
    fn discard_empty(&self, key: &K, slot: &Arc<OnceCell<V>>) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let unused = slots.get(key).map_or(false, |current| {
            Arc::ptr_eq(current, slot) && current.get().is_none() && Arc::strong_count(slot) == 2
        });
        if unused {
            slots.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(key).and_then(|slot| slot.get().cloned())
    }

    /// 已登记（创建成功）的条目数
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for IdentityRegistry<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
