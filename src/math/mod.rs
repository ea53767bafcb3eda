//! 数学工具
//!
//! 粒子演化用到的几何图元、数值辅助函数和确定性随机数源。

pub mod geometry;
pub mod random;

pub use geometry::{approx_zero, reflect, repeat, Aabb, LineSegment3, Plane, Ray};
pub use random::Random;
