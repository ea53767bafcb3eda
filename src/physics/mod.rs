//! 物理查询接口
//!
//! 粒子碰撞只依赖两种查询：包围盒重叠（粗筛）和单个碰撞体的射线检测（精筛）。
//! 查询方以trait对象注入，测试中可以替换为不依赖物理世界的实现。

pub mod physics3d;

use crate::math::{Aabb, Ray};
use glam::{Quat, Vec3};

pub use physics3d::PhysicsWorld3D;

/// 碰撞体的不透明句柄，由查询方分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u64);

/// 射线检测结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsQueryHit {
    /// 命中点（世界空间）
    pub point: Vec3,
    /// 命中点表面法线
    pub normal: Vec3,
    /// 沿射线的距离
    pub distance: f32,
}

/// 物理查询方
pub trait PhysicsQuery {
    /// 返回与 `bounds`（按 `rotation` 旋转）重叠、且属于 `layer` 的碰撞体
    fn box_overlap(&self, bounds: &Aabb, rotation: Quat, layer: u64) -> Vec<ColliderId>;

    /// 对单个碰撞体做射线检测，只报告 `max_distance` 以内的命中
    fn ray_cast(&self, collider: ColliderId, ray: &Ray, max_distance: f32) -> Option<PhysicsQueryHit>;
}
