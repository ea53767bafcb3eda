//! 几何图元
//!
//! 平面、线段、射线和轴对齐包围盒，以及碰撞响应用到的数值辅助函数。

use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// 沿法线镜像向量：`v - 2 * dot(v, n) * n`
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// 容差比较（与0比较）
#[inline]
pub fn approx_zero(value: f32) -> bool {
    value.abs() <= f32::EPSILON
}

/// 将 `t` 回绕到 `[0, length)`（取模而非截断）
#[inline]
pub fn repeat(t: f32, length: f32) -> f32 {
    let wrapped = t - (t / length).floor() * length;
    // 绝对值很小的负数回绕后会因舍入恰好等于 length
    if wrapped >= length {
        0.0
    } else {
        wrapped.max(0.0)
    }
}

/// 平面：`dot(normal, p) == d`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// 法线被归一化，`d` 按同一比例缩放，表示的仍是同一个平面
    ///
    /// 零法线或非有限法线得到零法线平面，它不会与任何粒子碰撞。
    pub fn new(normal: Vec3, d: f32) -> Self {
        let length = normal.length();
        if length.is_finite() && length > f32::EPSILON {
            Self {
                normal: normal / length,
                d: d / length,
            }
        } else {
            Self { normal: Vec3::ZERO, d }
        }
    }

    /// 归一化后的同一平面
    pub fn normalized(&self) -> Self {
        Self::new(self.normal, self.d)
    }

    /// 法线为零，不表示任何平面
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    /// 由平面上一点和法线构造（法线会被归一化）
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            d: normal.dot(point),
        }
    }

    /// 点到平面的有符号距离，法线一侧为正
    #[inline]
    pub fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.d
    }

    /// 用仿射矩阵变换平面
    ///
    /// 法线用逆转置矩阵变换，平面上的点用原矩阵变换，结果重新归一化。
    pub fn transform_affine(&self, matrix: &Mat4) -> Self {
        // 单位法线时 `normal * d` 才落在平面上
        let plane = self.normalized();
        let inverse_transpose = matrix.inverse().transpose();
        let normal = (inverse_transpose * plane.normal.extend(0.0)).truncate();
        let point = matrix.transform_point3(plane.normal * plane.d);

        Self::from_point_normal(point, normal)
    }

    /// 打包为 `[nx, ny, nz, d]`
    pub fn to_array(&self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.d]
    }

    pub fn from_array(values: [f32; 4]) -> Self {
        let packed = Vec4::from_array(values);
        Self::new(packed.truncate(), packed.w)
    }
}

/// 三维线段
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineSegment3 {
    pub start: Vec3,
    pub end: Vec3,
}

impl LineSegment3 {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// 射线，方向为单位向量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// 空包围盒，任意 `merge` 都会替换它
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// 扩展包围盒使其包含 `point`
    pub fn merge(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// 绕中心旋转后的外包围盒
    pub fn transformed(&self, rotation: Quat) -> Aabb {
        if self.is_empty() || rotation == Quat::IDENTITY {
            return *self;
        }

        let center = self.center();
        let half = self.half_extents();
        let axes = glam::Mat3::from_quat(rotation);
        let extent = axes.x_axis.abs() * half.x + axes.y_axis.abs() * half.y + axes.z_axis.abs() * half.z;

        Aabb::new(center - extent, center + extent)
    }
}
