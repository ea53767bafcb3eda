//! 成组射线检测
//!
//! 先用所有线段的总包围盒向物理世界做一次粗筛，再对每条线段逐个测试
//! 粗筛出的碰撞体，只保留最近的命中。

use crate::math::{approx_zero, Aabb, LineSegment3, Ray};
use crate::physics::{PhysicsQuery, PhysicsQueryHit};
use glam::{Quat, Vec3};

/// 粒子碰撞信息，只在一次演化调用内存在
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleHitInfo {
    pub position: Vec3,
    pub normal: Vec3,
    /// 线段（粒子）索引
    pub idx: u32,
}

/// 对一组线段做射线检测，把命中追加到 `hits`，返回命中数
///
/// 长度为0的线段直接跳过。命中是紧凑的：只包含真正碰到东西的线段。
pub fn group_raycast(
    physics: &dyn PhysicsQuery,
    segments: &[LineSegment3],
    layer: u64,
    hits: &mut Vec<ParticleHitInfo>,
) -> usize {
    if segments.is_empty() {
        return 0;
    }

    let mut group_bounds = Aabb::EMPTY;
    for segment in segments {
        group_bounds.merge(segment.start);
        group_bounds.merge(segment.end);
    }

    let colliders = physics.box_overlap(&group_bounds, Quat::IDENTITY, layer);
    if colliders.is_empty() {
        return 0;
    }

    let first_hit = hits.len();
    for (i, segment) in segments.iter().enumerate() {
        let diff = segment.end - segment.start;
        let length = diff.length();

        if approx_zero(length) {
            continue;
        }

        let ray = Ray::new(segment.start, diff / length);

        let mut nearest: Option<PhysicsQueryHit> = None;
        for &collider in &colliders {
            if let Some(query_hit) = physics.ray_cast(collider, &ray, length) {
                if nearest.map_or(true, |hit| query_hit.distance < hit.distance) {
                    nearest = Some(query_hit);
                }
            }
        }

        if let Some(hit) = nearest {
            hits.push(ParticleHitInfo {
                position: hit.point,
                normal: hit.normal,
                idx: i as u32,
            });
        }
    }

    let num_hits = hits.len() - first_hit;
    tracing::trace!(
        target: "particles",
        "Group raycast: {} segments, {} candidate colliders, {} hits",
        segments.len(),
        colliders.len(),
        num_hits
    );
    num_hits
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::physics::ColliderId;
    use std::cell::Cell;

    /// 由若干水平平面板组成的测试场景
    #[derive(Default)]
    pub(crate) struct MockPhysics {
        /// (高度, 层, 包围盒)
        pub floors: Vec<(f32, u64, Aabb)>,
        pub overlap_calls: Cell<usize>,
        pub ray_calls: Cell<usize>,
    }

    impl MockPhysics {
        pub(crate) fn with_floor(mut self, height: f32, layer: u64) -> Self {
            let bounds = Aabb::new(Vec3::new(-100.0, height, -100.0), Vec3::new(100.0, height, 100.0));
            self.floors.push((height, layer, bounds));
            self
        }
    }

    impl PhysicsQuery for MockPhysics {
        fn box_overlap(&self, bounds: &Aabb, _rotation: Quat, layer: u64) -> Vec<ColliderId> {
            self.overlap_calls.set(self.overlap_calls.get() + 1);
            self.floors
                .iter()
                .enumerate()
                .filter(|(_, (_, floor_layer, floor_bounds))| floor_layer & layer != 0 && floor_bounds.intersects(bounds))
                .map(|(i, _)| ColliderId(i as u64))
                .collect()
        }

        fn ray_cast(&self, collider: ColliderId, ray: &Ray, max_distance: f32) -> Option<PhysicsQueryHit> {
            self.ray_calls.set(self.ray_calls.get() + 1);
            let (height, _, _) = self.floors[collider.0 as usize];

            // 只能从上方命中
            if ray.direction.y >= 0.0 || ray.origin.y < height {
                return None;
            }

            let distance = (ray.origin.y - height) / -ray.direction.y;
            if distance > max_distance {
                return None;
            }

            Some(PhysicsQueryHit {
                point: ray.point_at(distance),
                normal: Vec3::Y,
                distance,
            })
        }
    }

    #[test]
    fn test_empty_segments() {
        let physics = MockPhysics::default().with_floor(0.0, 1);
        let mut hits = Vec::new();

        assert_eq!(group_raycast(&physics, &[], 1, &mut hits), 0);
        assert_eq!(physics.overlap_calls.get(), 0);
    }

    #[test]
    fn test_no_colliders_skips_narrow_phase() {
        let physics = MockPhysics::default();
        let segments = [LineSegment3::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0))];
        let mut hits = Vec::new();

        assert_eq!(group_raycast(&physics, &segments, u64::MAX, &mut hits), 0);
        assert_eq!(physics.overlap_calls.get(), 1);
        assert_eq!(physics.ray_calls.get(), 0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_nearest_hit_wins() {
        let physics = MockPhysics::default()
            .with_floor(-0.5, 1)
            .with_floor(0.5, 1)
            .with_floor(0.0, 1);
        let segments = [LineSegment3::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0))];
        let mut hits = Vec::new();

        assert_eq!(group_raycast(&physics, &segments, 1, &mut hits), 1);
        assert_eq!(hits[0].idx, 0);
        assert!((hits[0].position - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);
        assert_eq!(hits[0].normal, Vec3::Y);
    }

    #[test]
    fn test_hits_are_compacted() {
        let physics = MockPhysics::default().with_floor(0.0, 1);
        let segments = [
            // 未到达地面
            LineSegment3::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, 2.0, 0.0)),
            LineSegment3::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0)),
            // 向上运动
            LineSegment3::new(Vec3::new(2.0, -1.0, 0.0), Vec3::new(2.0, 1.0, 0.0)),
            LineSegment3::new(Vec3::new(3.0, 0.5, 0.0), Vec3::new(3.0, -0.5, 0.0)),
        ];
        let mut hits = Vec::new();

        assert_eq!(group_raycast(&physics, &segments, 1, &mut hits), 2);
        assert_eq!(hits.iter().map(|h| h.idx).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_degenerate_segment_skipped() {
        let physics = MockPhysics::default().with_floor(0.0, 1);
        let point = Vec3::new(0.0, 0.0, 0.0);
        let segments = [
            LineSegment3::new(point, point),
            LineSegment3::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
        ];
        let mut hits = Vec::new();

        assert_eq!(group_raycast(&physics, &segments, 1, &mut hits), 1);
        assert_eq!(hits[0].idx, 1);
        // 退化线段不参与精筛
        assert_eq!(physics.ray_calls.get(), 1);
    }

    #[test]
    fn test_layer_mask() {
        let physics = MockPhysics::default().with_floor(0.0, 0b10);
        let segments = [LineSegment3::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0))];
        let mut hits = Vec::new();

        assert_eq!(group_raycast(&physics, &segments, 0b01, &mut hits), 0);
        assert_eq!(group_raycast(&physics, &segments, 0b10, &mut hits), 1);
    }
}
