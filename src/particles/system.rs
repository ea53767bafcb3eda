//! 粒子系统
//!
//! 持有粒子集合和按顺序执行的演化器列表，每帧构造状态快照并依次调用演化器。
//! 发射器生命周期和渲染不在这里处理，这里只提供驱动演化所需的最小接口。

use crate::config::ParticleSystemConfig;
use crate::core::ParticleResult;
use crate::ecs::{Time, Transform};
use crate::math::Random;
use crate::particles::evolver::{EvolveContext, ParticleEvolver};
use crate::particles::material::{Material, ParticleMaterial};
use crate::particles::scratch::ParticleScratch;
use crate::particles::set::ParticleSet;
use crate::particles::state::ParticleSystemState;
use crate::physics::{PhysicsQuery, PhysicsWorld3D};
use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};
use std::sync::Arc;

/// 粒子系统组件
#[derive(Component)]
pub struct ParticleSystem {
    set: ParticleSet,
    evolvers: Vec<ParticleEvolver>,
    material: Option<Arc<Material>>,
    world_space: bool,
    random: Random,
    scratch: ParticleScratch,
}

impl ParticleSystem {
    pub fn new(max_particles: u32) -> Self {
        Self {
            set: ParticleSet::new(max_particles),
            evolvers: Vec::new(),
            material: None,
            world_space: true,
            random: Random::default(),
            scratch: ParticleScratch::new(),
        }
    }

    /// 按配置构造
    pub fn from_config(config: &ParticleSystemConfig) -> ParticleResult<Self> {
        config.validate()?;

        let mut system = Self::new(config.max_particles)
            .with_world_space(config.world_space)
            .with_seed(config.seed);
        for evolver in &config.evolvers {
            system.add_evolver(evolver.to_evolver()?);
        }

        tracing::debug!(
            target: "particles",
            "Particle system created: max_particles={}, evolvers={}",
            config.max_particles,
            system.evolvers.len()
        );
        Ok(system)
    }

    pub fn with_world_space(mut self, world_space: bool) -> Self {
        self.world_space = world_space;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.random.set_seed(seed);
        self
    }

    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_evolver(mut self, evolver: impl Into<ParticleEvolver>) -> Self {
        self.add_evolver(evolver);
        self
    }

    /// 追加演化器，按添加顺序执行
    pub fn add_evolver(&mut self, evolver: impl Into<ParticleEvolver>) {
        self.evolvers.push(evolver.into());
    }

    pub fn set_material(&mut self, material: Option<Arc<Material>>) {
        self.material = material;
    }

    pub fn evolvers(&self) -> &[ParticleEvolver] {
        &self.evolvers
    }

    pub fn set(&self) -> &ParticleSet {
        &self.set
    }

    pub fn set_mut(&mut self) -> &mut ParticleSet {
        &mut self.set
    }

    pub fn world_space(&self) -> bool {
        self.world_space
    }

    /// 生成 `count` 个粒子，返回第一个新粒子的索引
    ///
    /// 每个粒子的种子由系统随机数源生成。
    pub fn spawn(&mut self, count: u32, position: Vec3, velocity: Vec3, lifetime: f32) -> ParticleResult<u32> {
        let start = self.set.alloc_particles(count)?;
        let particles = self.set.particles_mut();

        for i in start as usize..(start + count) as usize {
            particles.position[i] = position;
            particles.velocity[i] = velocity;
            particles.lifetime[i] = lifetime;
            particles.initial_lifetime[i] = lifetime;
            particles.seed[i] = self.random.get();
        }

        Ok(start)
    }

    /// 执行一帧演化
    pub fn evolve(&mut self, time_step: f32, local_to_world: Mat4, physics: Option<&dyn PhysicsQuery>) {
        let state = ParticleSystemState::new(time_step, self.world_space, local_to_world);

        let Self {
            set,
            evolvers,
            material,
            random,
            scratch,
            ..
        } = self;

        let mut ctx = EvolveContext {
            random,
            material: material.as_deref().map(|m| m as &dyn ParticleMaterial),
            physics,
            scratch,
        };

        for evolver in evolvers.iter() {
            evolver.evolve(&mut ctx, &state, set);
        }
    }

    /// 回收生命耗尽的粒子，返回回收数量
    pub fn recycle_dead(&mut self) -> u32 {
        let mut freed = 0;
        let mut i = 0;

        while i < self.set.particle_count() {
            if self.set.particles().lifetime[i as usize] <= 0.0 {
                // 交换删除后同一索引上是新粒子，需要再检查一次
                if self.set.free_particle(i).is_err() {
                    break;
                }
                freed += 1;
            } else {
                i += 1;
            }
        }

        if freed > 0 {
            tracing::trace!(target: "particles", "Recycled {} particles", freed);
        }
        freed
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(1000)
    }
}

// ============================================================================
// ECS 系统
// ============================================================================

/// 粒子演化系统
///
/// 用实体的 `Transform` 作为本地空间，物理世界资源存在时启用世界几何碰撞。
pub fn particle_evolve_system(
    time: Res<Time>,
    physics: Option<Res<PhysicsWorld3D>>,
    mut systems: Query<(&mut ParticleSystem, Option<&Transform>)>,
) {
    let delta = time.delta_seconds;
    let physics = physics.as_deref().map(|p| p as &dyn PhysicsQuery);

    for (mut system, transform) in systems.iter_mut() {
        let local_to_world = transform.map_or(Mat4::IDENTITY, Transform::compute_matrix);
        system.evolve(delta, local_to_world, physics);
    }
}
