//! 粒子集合（SoA布局）
//!
//! 每个字段一个数组，所有数组长度始终等于存活粒子数。

use crate::core::{ParticleError, ParticleResult};
use glam::Vec3;

/// 粒子字段数组
#[derive(Debug, Clone, Default)]
pub struct ParticleSetData {
    /// 位置（世界或本地空间，取决于系统设置）
    pub position: Vec<Vec3>,
    /// 速度
    pub velocity: Vec<Vec3>,
    /// 剩余生命
    pub lifetime: Vec<f32>,
    /// 初始生命
    pub initial_lifetime: Vec<f32>,
    /// 生成时分配的种子，所有逐粒子随机性的来源
    pub seed: Vec<u32>,
    /// 精灵图帧（纹理动画的输出）
    pub frame: Vec<f32>,
}

impl ParticleSetData {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            position: Vec::with_capacity(capacity),
            velocity: Vec::with_capacity(capacity),
            lifetime: Vec::with_capacity(capacity),
            initial_lifetime: Vec::with_capacity(capacity),
            seed: Vec::with_capacity(capacity),
            frame: Vec::with_capacity(capacity),
        }
    }

    fn resize(&mut self, count: usize) {
        self.position.resize(count, Vec3::ZERO);
        self.velocity.resize(count, Vec3::ZERO);
        self.lifetime.resize(count, 0.0);
        self.initial_lifetime.resize(count, 0.0);
        self.seed.resize(count, 0);
        self.frame.resize(count, 0.0);
    }

    fn swap_remove(&mut self, index: usize) {
        self.position.swap_remove(index);
        self.velocity.swap_remove(index);
        self.lifetime.swap_remove(index);
        self.initial_lifetime.swap_remove(index);
        self.seed.swap_remove(index);
        self.frame.swap_remove(index);
    }

    /// 所有字段数组长度一致
    pub fn is_consistent(&self, count: usize) -> bool {
        self.position.len() == count
            && self.velocity.len() == count
            && self.lifetime.len() == count
            && self.initial_lifetime.len() == count
            && self.seed.len() == count
            && self.frame.len() == count
    }
}

/// 粒子集合
#[derive(Debug, Clone)]
pub struct ParticleSet {
    particles: ParticleSetData,
    count: u32,
    max_particles: u32,
}

impl ParticleSet {
    /// 创建集合，`max_particles` 为容量上限
    pub fn new(max_particles: u32) -> Self {
        Self {
            particles: ParticleSetData::with_capacity(max_particles as usize),
            count: 0,
            max_particles,
        }
    }

    /// 分配 `count` 个新粒子，返回第一个新粒子的索引
    ///
    /// 新粒子所有字段为零值。
    pub fn alloc_particles(&mut self, count: u32) -> ParticleResult<u32> {
        let requested = self.count.saturating_add(count);
        if requested > self.max_particles {
            return Err(ParticleError::CapacityExceeded {
                requested,
                max: self.max_particles,
            });
        }

        let start = self.count;
        self.count = requested;
        self.particles.resize(requested as usize);
        Ok(start)
    }

    /// 释放粒子，最后一个粒子被移动到 `index` 处
    pub fn free_particle(&mut self, index: u32) -> ParticleResult<()> {
        if index >= self.count {
            return Err(ParticleError::InvalidIndex {
                index,
                count: self.count,
            });
        }

        self.particles.swap_remove(index as usize);
        self.count -= 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.count = 0;
        self.particles.resize(0);
    }

    pub fn particle_count(&self) -> u32 {
        self.count
    }

    pub fn capacity(&self) -> u32 {
        self.max_particles
    }

    pub fn particles(&self) -> &ParticleSetData {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSetData {
        &mut self.particles
    }
}

impl Default for ParticleSet {
    fn default() -> Self {
        Self::new(1000)
    }
}
