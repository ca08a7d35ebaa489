//! 身份注册表测试

use crate::error::ToolkitError;
use crate::registry::IdentityRegistry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 测试同一句柄返回同一个对象
#[test]
fn test_same_key_same_value() {
    let registry: IdentityRegistry<u64, Arc<String>> = IdentityRegistry::new();

    let a = registry.lookup_or_create(7, |k| Ok(Arc::new(format!("display-{}", k)))).unwrap();
    let b = registry
        .lookup_or_create(7, |_| panic!("factory must not run for a known handle"))
        .unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(registry.len(), 1);
}

/// 测试不同句柄得到不同对象
#[test]
fn test_distinct_keys_distinct_values() {
    let registry: IdentityRegistry<u64, Arc<String>> = IdentityRegistry::new();

    let a = registry.lookup_or_create(1, |_| Ok(Arc::new("same".to_string()))).unwrap();
    let b = registry.lookup_or_create(2, |_| Ok(Arc::new("same".to_string()))).unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(registry.len(), 2);
    assert!(registry.get(&1).is_some());
    assert!(registry.get(&3).is_none());
}

/// 测试按值比较的复合句柄
#[test]
fn test_structural_key_equality() {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Output {
        connector: String,
        index: u32,
    }

    let registry: IdentityRegistry<Output, Arc<u32>> = IdentityRegistry::new();
    let key = |index| Output { connector: "HDMI".to_string(), index };

    let a = registry.lookup_or_create(key(0), |k| Ok(Arc::new(k.index))).unwrap();
    let b = registry.lookup_or_create(key(0), |k| Ok(Arc::new(k.index + 100))).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(*b, 0);
}

/// 测试创建失败不登记，下次重试
#[test]
fn test_failed_factory_not_cached() {
    let registry: IdentityRegistry<u64, Arc<u64>> = IdentityRegistry::new();

    let result = registry.lookup_or_create(5, |_| {
        Err(ToolkitError::BackendFailure("not ready".to_string()))
    });
    assert!(matches!(result, Err(ToolkitError::BackendFailure(_))));
    assert!(registry.is_empty());
    assert!(registry.get(&5).is_none());
    assert_eq!(registry.slot_count(), 0);

    let value = registry.lookup_or_create(5, |k| Ok(Arc::new(*k))).unwrap();
    assert_eq!(*value, 5);
    assert_eq!(registry.len(), 1);
}

/// 测试并发查找同一句柄只创建一次
#[test]
fn test_concurrent_lookup_creates_once() {
    let registry: IdentityRegistry<u64, Arc<usize>> = IdentityRegistry::new();
    let created = AtomicUsize::new(0);

    let values: Vec<Arc<usize>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    registry
                        .lookup_or_create(42, |_| {
                            let n = created.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(5));
                            Ok(Arc::new(n))
                        })
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(created.load(Ordering::SeqCst), 1);
    for value in &values {
        assert!(Arc::ptr_eq(value, &values[0]));
    }
}

/// 测试大量失败的句柄不会留下空槽位
#[test]
fn test_failed_handles_leave_no_slots() {
    let registry: IdentityRegistry<u64, Arc<u64>> = IdentityRegistry::new();

    for handle in 0..100 {
        let result = registry.lookup_or_create(handle, |k| {
            Err(ToolkitError::BackendFailure(format!("display {} unplugged", k)))
        });
        assert!(result.is_err());
    }
    assert_eq!(registry.slot_count(), 0);

    registry.lookup_or_create(7, |k| Ok(Arc::new(*k))).unwrap();
    assert_eq!(registry.slot_count(), 1);
    assert_eq!(registry.len(), 1);
}
