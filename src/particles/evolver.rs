//! 粒子演化器
//!
//! 演化器是每帧对粒子集合做一次原地修改的策略。集合是封闭的，
//! 调用方只需要统一的 `evolve` 入口。

use crate::math::Random;
use crate::particles::collisions::ParticleCollisions;
use crate::particles::material::ParticleMaterial;
use crate::particles::scratch::ParticleScratch;
use crate::particles::set::ParticleSet;
use crate::particles::state::ParticleSystemState;
use crate::particles::texture_animation::ParticleTextureAnimation;
use crate::physics::PhysicsQuery;

/// 演化器调用时注入的协作者
pub struct EvolveContext<'a> {
    /// 粒子系统级随机数源
    pub random: &'a mut Random,
    /// 发射器绑定的材质
    pub material: Option<&'a dyn ParticleMaterial>,
    /// 物理查询方（世界几何碰撞需要）
    pub physics: Option<&'a dyn PhysicsQuery>,
    /// 临时内存
    pub scratch: &'a mut ParticleScratch,
}

/// 演化器
#[derive(Debug, Clone)]
pub enum ParticleEvolver {
    /// 精灵图帧动画
    TextureAnimation(ParticleTextureAnimation),
    /// 碰撞响应
    Collisions(ParticleCollisions),
}

impl ParticleEvolver {
    /// 对集合中的所有粒子执行一次演化
    pub fn evolve(
        &self,
        ctx: &mut EvolveContext<'_>,
        state: &ParticleSystemState,
        set: &mut ParticleSet,
    ) {
        match self {
            Self::TextureAnimation(animation) => animation.evolve(ctx, state, set),
            Self::Collisions(collisions) => collisions.evolve(ctx, state, set),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TextureAnimation(_) => "texture_animation",
            Self::Collisions(_) => "collisions",
        }
    }
}

impl From<ParticleTextureAnimation> for ParticleEvolver {
    fn from(animation: ParticleTextureAnimation) -> Self {
        Self::TextureAnimation(animation)
    }
}

impl From<ParticleCollisions> for ParticleEvolver {
    fn from(collisions: ParticleCollisions) -> Self {
        Self::Collisions(collisions)
    }
}
