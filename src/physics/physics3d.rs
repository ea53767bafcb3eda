use crate::math::{Aabb, Ray};
use crate::physics::{ColliderId, PhysicsQuery, PhysicsQueryHit};
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use rapier3d::parry::query::RayCast;
use rapier3d::prelude::*;

// --- Resources ---

/// 基于Rapier的物理世界，只保留粒子碰撞需要的碰撞体与查询管线
#[derive(Resource)]
pub struct PhysicsWorld3D {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld3D {
    fn default() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }
}

impl PhysicsWorld3D {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加静态盒子碰撞体
    ///
    /// `layer` 写入碰撞组的membership，粒子查询按它过滤。
    pub fn add_static_cuboid(&mut self, position: Vec3, half_extents: Vec3, layer: u32) -> ColliderId {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(InteractionGroups::new(Group::from_bits_truncate(layer), Group::ALL))
            .build();
        self.insert_collider(collider)
    }

    /// 添加静态球体碰撞体
    pub fn add_static_ball(&mut self, position: Vec3, radius: f32, layer: u32) -> ColliderId {
        let collider = ColliderBuilder::ball(radius)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(InteractionGroups::new(Group::from_bits_truncate(layer), Group::ALL))
            .build();
        self.insert_collider(collider)
    }

    /// 移除碰撞体
    pub fn remove_collider(&mut self, id: ColliderId) -> bool {
        let mut islands = IslandManager::new();
        self.collider_set
            .remove(to_handle(id), &mut islands, &mut self.rigid_body_set, false)
            .is_some()
    }

    /// 碰撞体变化后刷新查询管线
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    fn insert_collider(&mut self, collider: Collider) -> ColliderId {
        let handle = self.collider_set.insert(collider);
        tracing::debug!(target: "physics", "Inserted collider {:?}", handle);
        from_handle(handle)
    }
}

impl PhysicsQuery for PhysicsWorld3D {
    fn box_overlap(&self, bounds: &Aabb, rotation: Quat, layer: u64) -> Vec<ColliderId> {
        if bounds.is_empty() {
            return Vec::new();
        }

        // Rapier的粗筛只接受轴对齐盒子，旋转后取外包围盒
        let bounds = bounds.transformed(rotation);
        let aabb = rapier3d::prelude::Aabb::new(
            point![bounds.min.x, bounds.min.y, bounds.min.z],
            point![bounds.max.x, bounds.max.y, bounds.max.z],
        );
        let mask = Group::from_bits_truncate(layer as u32);

        let mut colliders = Vec::new();
        self.query_pipeline
            .colliders_with_aabb_intersecting_aabb(&aabb, |handle| {
                if let Some(collider) = self.collider_set.get(*handle) {
                    if collider.collision_groups().memberships.intersects(mask) {
                        colliders.push(from_handle(*handle));
                    }
                }
                true
            });

        colliders
    }

    fn ray_cast(&self, collider: ColliderId, ray: &Ray, max_distance: f32) -> Option<PhysicsQueryHit> {
        let collider = self.collider_set.get(to_handle(collider))?;
        let rapier_ray = rapier3d::prelude::Ray::new(
            point![ray.origin.x, ray.origin.y, ray.origin.z],
            vector![ray.direction.x, ray.direction.y, ray.direction.z],
        );

        let intersection = collider.shape().cast_ray_and_get_normal(
            collider.position(),
            &rapier_ray,
            max_distance,
            true,
        )?;

        let distance = intersection.time_of_impact;
        let normal = intersection.normal;
        Some(PhysicsQueryHit {
            point: ray.point_at(distance),
            normal: Vec3::new(normal.x, normal.y, normal.z),
            distance,
        })
    }
}

fn from_handle(handle: ColliderHandle) -> ColliderId {
    let (index, generation) = handle.into_raw_parts();
    ColliderId(((generation as u64) << 32) | index as u64)
}

fn to_handle(id: ColliderId) -> ColliderHandle {
    ColliderHandle::from_raw_parts(id.0 as u32, (id.0 >> 32) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_world() -> PhysicsWorld3D {
        let mut world = PhysicsWorld3D::new();
        world.add_static_cuboid(Vec3::ZERO, Vec3::new(10.0, 0.1, 10.0), 0b1);
        world.update_queries();
        world
    }

    #[test]
    fn test_handle_round_trip() {
        let mut world = PhysicsWorld3D::new();
        let id = world.add_static_ball(Vec3::ZERO, 1.0, 1);
        assert!(world.collider_set.get(to_handle(id)).is_some());
    }

    #[test]
    fn test_box_overlap() {
        let world = ground_world();

        let near = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(world.box_overlap(&near, Quat::IDENTITY, u64::MAX).len(), 1);

        let far = Aabb::new(Vec3::new(50.0, 50.0, 50.0), Vec3::new(51.0, 51.0, 51.0));
        assert!(world.box_overlap(&far, Quat::IDENTITY, u64::MAX).is_empty());
    }

    #[test]
    fn test_box_overlap_layer_filter() {
        let world = ground_world();
        let near = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));

        assert!(world.box_overlap(&near, Quat::IDENTITY, 0b10).is_empty());
        assert_eq!(world.box_overlap(&near, Quat::IDENTITY, 0b11).len(), 1);
    }

    #[test]
    fn test_ray_cast() {
        let world = ground_world();
        let colliders = world.box_overlap(
            &Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
            Quat::IDENTITY,
            u64::MAX,
        );

        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        let hit = world.ray_cast(colliders[0], &ray, 20.0).unwrap();

        assert!((hit.distance - 9.9).abs() < 1e-4);
        assert!((hit.point.y - 0.1).abs() < 1e-4);
        assert!((hit.normal - Vec3::Y).length() < 1e-4);

        assert!(world.ray_cast(colliders[0], &ray, 5.0).is_none());
    }

    #[test]
    fn test_remove_collider() {
        let mut world = PhysicsWorld3D::new();
        let id = world.add_static_ball(Vec3::ZERO, 1.0, 1);
        assert_eq!(world.collider_count(), 1);
        assert!(world.remove_collider(id));
        assert_eq!(world.collider_count(), 0);
    }
}
