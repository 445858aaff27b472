//! 包围盒计算引擎
//!
//! 纯函数：给定非空点集，计算各轴尺寸和包围盒中心。
//! 不依赖任何记录上下文，创建与更新扫描时共用。

use crate::error::CoreError;
use crate::math::{Aabb3, Point3, Vector3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// 点数达到该值时改用 rayon 并行折叠
pub const PARALLEL_THRESHOLD: usize = 16 * 1024;

/// 点集的派生几何信息
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// 各轴方向上的尺寸，均非负
    pub extent: Vector3,
    /// 包围盒中心（不是点集质心）
    pub center: Point3,
}

impl Bounds {
    pub fn from_aabb(aabb: &Aabb3) -> Self {
        Self {
            extent: aabb.extent(),
            center: aabb.center(),
        }
    }
}

/// 检查点集形状：至少一个点，且所有坐标均为有限值
pub fn validate_points(points: &[Point3]) -> Result<(), CoreError> {
    if points.is_empty() {
        return Err(CoreError::invalid_input("empty point set"));
    }

    if let Some(index) = points
        .iter()
        .position(|p| !p.coords.iter().all(|c| c.is_finite()))
    {
        return Err(CoreError::invalid_input(format!(
            "point {index} has a non-finite coordinate"
        )));
    }

    Ok(())
}

/// 计算点集的轴对齐包围盒
pub fn aabb_of(points: &[Point3]) -> Result<Aabb3, CoreError> {
    validate_points(points)?;

    let aabb = if points.len() >= PARALLEL_THRESHOLD {
        points
            .par_iter()
            .fold(Aabb3::empty, |mut acc, p| {
                acc.expand_to_include(p);
                acc
            })
            .reduce(Aabb3::empty, |a, b| a.union(&b))
    } else {
        Aabb3::from_points(points.iter().copied())
    };
    debug_assert!(!aabb.is_empty());

    Ok(aabb)
}

/// 计算点集的包围盒尺寸和中心
///
/// 对每个轴独立取 `min`/`max`：`extent = max - min`，
/// `center` 取 `min` 与 `max` 的中点。结果与点的顺序和重复无关。
///
/// # Errors
///
/// 点集为空、含非有限坐标或某轴尺寸超出 `f64` 范围时返回
/// [`CoreError::InvalidInput`]。
pub fn compute_bounds(points: &[Point3]) -> Result<Bounds, CoreError> {
    let bounds = Bounds::from_aabb(&aabb_of(points)?);

    if let Some(axis) = (0..3).find(|&axis| !bounds.extent[axis].is_finite()) {
        return Err(CoreError::invalid_input(format!(
            "extent along axis {axis} overflows"
        )));
    }

    Ok(bounds)
}
