//! 预置扫描数据
//!
//! 启动时可以预置内置的示例扫描，或从JSON文件读取扫描列表。
//! 文件格式为数组，每项形如 `{"points": [[x, y, z], ...]}`。

use crate::error::RegistryError;
use pointscan_core::math::Point3;
use pointscan_core::scan::NewScan;
use std::path::Path;
use tracing::info;

/// 内置示例扫描
pub fn demo_point_sets() -> Vec<NewScan> {
    vec![
        NewScan::new(vec![
            Point3::new(5.0, 7.0, -3.4),
            Point3::new(8.0, 5.0, 2.2),
            Point3::new(10.0, 12.0, 6.0),
            Point3::new(15.1, 9.2, 2.2),
            Point3::new(9.3, 10.2, 3.1),
        ]),
        NewScan::new(vec![
            Point3::new(-5.0, -7.0, 3.4),
            Point3::new(-8.0, -5.0, -2.2),
            Point3::new(-10.0, -12.0, -6.0),
            Point3::new(-15.1, -9.2, -2.2),
            Point3::new(-9.3, -10.2, -3.1),
        ]),
        NewScan::new(vec![
            Point3::new(1.4, 5.6, -2.1),
            Point3::new(9.5, 5.0, 2.2),
            Point3::new(10.0, 21.3, 6.0),
            Point3::new(15.1, 9.2, 2.2),
            Point3::new(9.3, 10.2, 11.8),
        ]),
    ]
}

/// 从JSON文件读取预置扫描
///
/// 只做格式解析，点集的有效性在写入注册表时检查。
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<NewScan>, RegistryError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let scans: Vec<NewScan> = serde_json::from_str(&contents)?;

    info!("Loaded {} seed scans from {}", scans.len(), path.display());
    Ok(scans)
}
