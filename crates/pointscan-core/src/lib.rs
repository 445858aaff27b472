//! Pointscan 核心几何引擎
//!
//! 提供3D点集的轴对齐包围盒计算，以及扫描（Scan）实体本身。
//!
//! # 架构设计
//!
//! - `bounds`: 纯函数几何引擎，点集 → 包围盒尺寸 + 中心
//! - `scan`: 扫描实体，派生字段始终由点集重新计算
//! - `math`: 基于 nalgebra 的基础类型
//!
//! # 示例
//!
//! ```rust
//! use pointscan_core::prelude::*;
//!
//! let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 2.0, -2.0)];
//! let bounds = compute_bounds(&points).unwrap();
//!
//! assert_eq!(bounds.extent, Vector3::new(4.0, 2.0, 2.0));
//! assert_eq!(bounds.center, Point3::new(2.0, 1.0, -1.0));
//! ```

pub mod bounds;
pub mod error;
pub mod math;
pub mod scan;

pub use error::CoreError;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::bounds::{compute_bounds, validate_points, Bounds};
    pub use crate::error::CoreError;
    pub use crate::math::{Aabb3, Point3, Vector3};
    pub use crate::scan::{NewScan, Scan, ScanId, ScanPatch};
}
