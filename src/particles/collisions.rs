//! 粒子碰撞
//!
//! 两种模式：与一组平面碰撞，或通过成组射线检测与物理世界中的几何体碰撞。
//! 两种模式使用同一套响应公式。

use crate::math::{approx_zero, reflect, LineSegment3, Plane};
use crate::particles::evolver::EvolveContext;
use crate::particles::raycast::{group_raycast, ParticleHitInfo};
use crate::particles::scratch::ParticleScratch;
use crate::particles::set::ParticleSet;
use crate::particles::state::ParticleSystemState;
use crate::physics::PhysicsQuery;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// 碰撞模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleCollisionMode {
    /// 与用户提供的平面碰撞
    Plane,
    /// 与物理世界中的碰撞体碰撞
    World,
}

/// 碰撞配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleCollisionsDesc {
    pub mode: ParticleCollisionMode,
    /// 反弹系数，0表示不反弹，1表示完全反弹；不小于0
    pub restitution: f32,
    /// 碰撞后速度衰减比例，[0, 1]
    pub dampening: f32,
    /// 每次碰撞损失的生命（占初始生命的比例），[0, 1]
    pub lifetime_loss: f32,
    /// 粒子半径，仅平面模式使用；不小于0
    pub radius: f32,
    /// 世界模式下参与碰撞的物理层
    #[serde(with = "crate::config::layer_mask")]
    pub layer: u64,
}

impl Default for ParticleCollisionsDesc {
    fn default() -> Self {
        Self {
            mode: ParticleCollisionMode::Plane,
            restitution: 1.0,
            dampening: 0.5,
            lifetime_loss: 0.0,
            radius: 0.01,
            layer: u64::MAX,
        }
    }
}

impl ParticleCollisionsDesc {
    /// 把各字段限制到合法范围
    pub fn clamped(mut self) -> Self {
        self.restitution = self.restitution.max(0.0);
        self.dampening = self.dampening.clamp(0.0, 1.0);
        self.lifetime_loss = self.lifetime_loss.clamp(0.0, 1.0);
        self.radius = self.radius.max(0.0);
        self
    }
}

/// 碰撞演化器
#[derive(Debug, Clone)]
pub struct ParticleCollisions {
    desc: ParticleCollisionsDesc,
    /// 世界空间碰撞平面
    planes: Vec<Plane>,
}

impl ParticleCollisions {
    pub fn new(desc: ParticleCollisionsDesc) -> Self {
        Self {
            desc: desc.clamped(),
            planes: Vec::new(),
        }
    }

    pub fn desc(&self) -> &ParticleCollisionsDesc {
        &self.desc
    }

    pub fn set_desc(&mut self, desc: ParticleCollisionsDesc) {
        self.desc = desc.clamped();
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// 设置碰撞平面（世界空间）
    /// 平面在存入时归一化
    pub fn set_planes(&mut self, planes: Vec<Plane>) {
        self.planes = planes.iter().map(Plane::normalized).collect();
    }

    pub fn add_plane(&mut self, plane: Plane) {
        self.planes.push(plane.normalized());
    }

    pub fn with_planes(mut self, planes: Vec<Plane>) -> Self {
        self.set_planes(planes);
        self
    }

    pub fn evolve(&self, ctx: &mut EvolveContext<'_>, state: &ParticleSystemState, set: &mut ParticleSet) {
        debug_assert!(set.particles().is_consistent(set.particle_count() as usize));

        match self.desc.mode {
            ParticleCollisionMode::Plane => self.collide_planes(ctx.scratch, state, set),
            ParticleCollisionMode::World => match ctx.physics {
                Some(physics) => self.collide_world(physics, ctx.scratch, state, set),
                None => {
                    tracing::debug!(target: "particles", "World collisions skipped: no physics scene");
                }
            },
        }
    }

    /// 平面模式：按配置顺序扫描平面，第一个满足条件的平面生效
    fn collide_planes(&self, scratch: &mut ParticleScratch, state: &ParticleSystemState, set: &mut ParticleSet) {
        let mut local_planes = scratch.planes.acquire(self.planes.len());

        // 粒子在本地空间时，平面每帧变换一次
        let planes: &[Plane] = if state.world_space {
            &self.planes
        } else {
            local_planes.extend(
                self.planes
                    .iter()
                    .map(|plane| plane.transform_affine(&state.world_to_local)),
            );
            &local_planes[..]
        };

        let count = set.particle_count() as usize;
        let particles = set.particles_mut();

        for i in 0..count {
            let position = particles.position[i];
            let velocity = particles.velocity[i];

            for plane in planes {
                let dist = plane.distance(position);
                if dist > self.desc.radius {
                    continue;
                }

                let dist_to_travel_along_normal = plane.normal.dot(velocity);

                // 平行于平面的运动忽略
                if approx_zero(dist_to_travel_along_normal) {
                    continue;
                }

                let dist_from_boundary = self.desc.radius - dist;
                let ray_t = dist_from_boundary / dist_to_travel_along_normal;

                let hit = ParticleHitInfo {
                    position: position + velocity * ray_t,
                    normal: plane.normal,
                    idx: i as u32,
                };

                let (new_position, new_velocity) = calc_collision_response(position, velocity, &hit, &self.desc);
                particles.position[i] = new_position;
                particles.velocity[i] = new_velocity;
                particles.lifetime[i] -= self.desc.lifetime_loss * particles.initial_lifetime[i];

                break;
            }
        }
    }

    /// 世界模式：每个粒子用本帧的运动线段做射线检测，最近命中生效
    fn collide_world(
        &self,
        physics: &dyn PhysicsQuery,
        scratch: &mut ParticleScratch,
        state: &ParticleSystemState,
        set: &mut ParticleSet,
    ) {
        let count = set.particle_count() as usize;
        let particles = set.particles_mut();

        let ParticleScratch { segments, hits, .. } = scratch;
        let mut segments = segments.acquire(count);
        let mut hits = hits.acquire(count);

        segments.extend((0..count).map(|i| {
            let position = particles.position[i];
            let velocity = particles.velocity[i];
            LineSegment3::new(position - velocity * state.time_step, position)
        }));

        if !state.world_space {
            for segment in segments.iter_mut() {
                segment.start = state.local_to_world.transform_point3(segment.start);
                segment.end = state.local_to_world.transform_point3(segment.end);
            }
        }

        group_raycast(physics, &segments, self.desc.layer, &mut hits);

        if !state.world_space {
            for hit in hits.iter_mut() {
                hit.position = state.world_to_local.transform_point3(hit.position);
                hit.normal = state
                    .world_to_local
                    .transform_vector3(hit.normal)
                    .normalize_or_zero();
            }
        }

        for hit in hits.iter() {
            let idx = hit.idx as usize;

            let (new_position, new_velocity) =
                calc_collision_response(particles.position[idx], particles.velocity[idx], hit, &self.desc);
            particles.position[idx] = new_position;
            particles.velocity[idx] = new_velocity;
            particles.lifetime[idx] -= self.desc.lifetime_loss * particles.initial_lifetime[idx];
        }
    }
}

impl Default for ParticleCollisions {
    fn default() -> Self {
        Self::new(ParticleCollisionsDesc::default())
    }
}

/// 碰撞响应：返回新的位置和速度
///
/// 相对命中点的位移和速度先沿法线反射并按 `dampening` 衰减，
/// 再按 `1 - restitution` 去掉法线方向的分量。
pub fn calc_collision_response(
    position: Vec3,
    velocity: Vec3,
    hit: &ParticleHitInfo,
    desc: &ParticleCollisionsDesc,
) -> (Vec3, Vec3) {
    let diff = position - hit.position;

    // 反射并衰减
    let dampen_factor = 1.0 - desc.dampening;

    let mut reflected_pos = reflect(diff, hit.normal) * dampen_factor;
    let mut reflected_vel = reflect(velocity, hit.normal) * dampen_factor;

    // 反弹
    let restitution_factor = 1.0 - desc.restitution;

    reflected_pos -= hit.normal * reflected_pos.dot(hit.normal) * restitution_factor;
    reflected_vel -= hit.normal * reflected_vel.dot(hit.normal) * restitution_factor;

    (hit.position + reflected_pos, reflected_vel)
}
