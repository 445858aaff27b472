//! 扫描注册表
//!
//! 独占所有扫描记录。标识计数器和记录集合位于同一把锁之后，
//! 每个操作在锁内完整执行：不会有两次创建拿到同一个标识，
//! 也不会读到构建到一半的记录。

use crate::error::RegistryError;
use parking_lot::Mutex;
use pointscan_core::math::Point3;
use pointscan_core::scan::{NewScan, Scan, ScanId, ScanPatch};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default)]
struct RegistryState {
    /// 最近分配的标识，0表示尚未分配
    last_id: u64,
    scans: BTreeMap<ScanId, Scan>,
}

/// 扫描注册表
#[derive(Debug, Default)]
pub struct Registry {
    state: Mutex<RegistryState>,
}

impl Registry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建注册表并按顺序预置扫描
    ///
    /// 标识依次为 1..=n，之后创建的扫描从 n+1 开始。
    pub fn with_seed(seed: impl IntoIterator<Item = NewScan>) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for scan in seed {
            registry.create(scan.points)?;
        }
        Ok(registry)
    }

    /// 创建扫描
    ///
    /// 先校验点集再分配标识，被拒绝的请求不占用标识。
    pub fn create(&self, points: Vec<Point3>) -> Result<Scan, RegistryError> {
        let mut state = self.state.lock();

        let id = ScanId::new(state.last_id + 1);
        let scan = Scan::new(id, points)?;
        state.last_id = id.raw();
        state.scans.insert(id, scan.clone());

        debug!(%id, points = scan.points().len(), "Created scan");
        Ok(scan)
    }

    /// 按标识获取扫描
    pub fn get(&self, id: ScanId) -> Result<Scan, RegistryError> {
        self.state
            .lock()
            .scans
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// 部分更新扫描
    ///
    /// 点集变化时重新计算包围盒和中心；新点集无效时记录保持不变。
    pub fn update(&self, id: ScanId, patch: ScanPatch) -> Result<Scan, RegistryError> {
        let mut state = self.state.lock();
        let scan = state
            .scans
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(id))?;

        let touches_points = !patch.is_empty();
        scan.apply(patch)?;

        debug!(%id, touches_points, "Updated scan");
        Ok(scan.clone())
    }

    /// 所有扫描，按标识升序
    pub fn list(&self) -> Vec<Scan> {
        self.state.lock().scans.values().cloned().collect()
    }

    /// 扫描数量
    pub fn len(&self) -> usize {
        self.state.lock().scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
