//! 扫描实体
//!
//! 扫描由点集及其派生的包围盒尺寸和中心组成。派生字段是私有的，
//! 只能经由几何引擎写入，因此总与当前点集一致。

use crate::bounds::{compute_bounds, Bounds};
use crate::error::CoreError;
use crate::math::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// 扫描唯一标识符
///
/// 由注册表分配，从1开始单调递增，不会复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(pub u64);

impl ScanId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScanId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// 扫描记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scan {
    id: ScanId,
    points: Vec<Point3>,
    bounding_box: Vector3,
    center: Point3,
}

impl Scan {
    /// 创建扫描并计算派生字段
    pub fn new(id: ScanId, points: Vec<Point3>) -> Result<Self, CoreError> {
        let bounds = compute_bounds(&points)?;
        Ok(Self {
            id,
            points,
            bounding_box: bounds.extent,
            center: bounds.center,
        })
    }

    pub fn id(&self) -> ScanId {
        self.id
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// 各轴方向上的包围盒尺寸
    pub fn bounding_box(&self) -> Vector3 {
        self.bounding_box
    }

    /// 包围盒中心
    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            extent: self.bounding_box,
            center: self.center,
        }
    }

    /// 替换点集并重新计算派生字段
    ///
    /// 新点集无效时记录保持不变。
    pub fn set_points(&mut self, points: Vec<Point3>) -> Result<(), CoreError> {
        let bounds = compute_bounds(&points)?;
        self.points = points;
        self.bounding_box = bounds.extent;
        self.center = bounds.center;
        Ok(())
    }

    /// 将部分更新叠加到当前记录
    pub fn apply(&mut self, patch: ScanPatch) -> Result<(), CoreError> {
        if let Some(points) = patch.points {
            self.set_points(points)?;
        }
        Ok(())
    }
}

/// 创建扫描的请求数据
///
/// 只接受 `points`；`id` 和派生字段由系统生成，客户端提供时拒绝。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewScan {
    pub points: Vec<Point3>,
}

impl NewScan {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }
}

/// 扫描的部分更新
///
/// 列出允许修改的字段，其余字段一律拒绝。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point3>>,
}

impl ScanPatch {
    pub fn with_points(points: Vec<Point3>) -> Self {
        Self {
            points: Some(points),
        }
    }

    /// 是否不修改任何字段
    pub fn is_empty(&self) -> bool {
        self.points.is_none()
    }
}
