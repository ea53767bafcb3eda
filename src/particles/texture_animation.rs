//! 精灵图帧动画
//!
//! 根据粒子已消耗的生命比例计算连续的帧号，可选地按粒子种子随机选择一行。

use crate::math::{repeat, Random};
use crate::particles::evolver::EvolveContext;
use crate::particles::material::{ParticleMaterial, SpriteSheetGridAnimation, SPRITE_TEXTURE_PARAM};
use crate::particles::set::ParticleSet;
use crate::particles::state::ParticleSystemState;
use serde::{Deserialize, Serialize};

/// 行随机的种子偏移
///
/// 每个粒子只有一个种子，不同的随机属性各自加一个固定偏移后再播种，
/// 使它们互不相关。其他逐粒子随机属性不得复用这个值。
pub const PARTICLE_ROW_VARIATION: u32 = 0x1e8b_2f4a;

/// 纹理动画配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTextureAnimationDesc {
    /// 每个粒子随机选择一行播放，而不是播放整张精灵图
    pub randomize_row: bool,
    /// 粒子生命周期内循环播放的次数
    pub num_cycles: u32,
}

impl Default for ParticleTextureAnimationDesc {
    fn default() -> Self {
        Self {
            randomize_row: false,
            num_cycles: 1,
        }
    }
}

/// 纹理动画演化器
#[derive(Debug, Clone, Default)]
pub struct ParticleTextureAnimation {
    desc: ParticleTextureAnimationDesc,
}

impl ParticleTextureAnimation {
    pub fn new(desc: ParticleTextureAnimationDesc) -> Self {
        Self { desc }
    }

    pub fn desc(&self) -> &ParticleTextureAnimationDesc {
        &self.desc
    }

    pub fn set_desc(&mut self, desc: ParticleTextureAnimationDesc) {
        self.desc = desc;
    }

    /// 写入每个粒子的 `frame`
    ///
    /// 没有材质、精灵图未加载或网格描述无效时，所有粒子的帧号置0。
    /// 调用方需保证 `initial_lifetime > 0`。
    pub fn evolve(&self, ctx: &mut EvolveContext<'_>, _state: &ParticleSystemState, set: &mut ParticleSet) {
        let count = set.particle_count() as usize;
        let particles = set.particles_mut();
        debug_assert!(particles.is_consistent(count));

        let Some(animation) = ctx.material.and_then(resolve_grid_animation) else {
            tracing::trace!(target: "particles", "No valid sprite sheet animation, resetting {} frames", count);
            particles.frame.fill(0.0);
            return;
        };

        for i in 0..count {
            let (frame_offset, num_frames) = if self.desc.randomize_row {
                let row = random_row(particles.seed[i], &animation);
                (row * animation.num_columns, animation.num_columns)
            } else {
                (0, animation.count)
            };

            let initial_lifetime = particles.initial_lifetime[i];
            let particle_t = (initial_lifetime - particles.lifetime[i]) / initial_lifetime;
            let particle_t = repeat(self.desc.num_cycles as f32 * particle_t, 1.0);

            let frame = particle_t * num_frames as f32;
            particles.frame[i] = frame_offset as f32 + frame.clamp(0.0, (num_frames - 1) as f32);
        }
    }
}

/// 从材质中取出可用的网格动画
pub fn resolve_grid_animation(material: &dyn ParticleMaterial) -> Option<SpriteSheetGridAnimation> {
    if !material.is_loaded() {
        return None;
    }

    let texture = material.sprite_texture(SPRITE_TEXTURE_PARAM)?;
    if !texture.loaded || !texture.animation.is_valid() {
        return None;
    }

    Some(texture.animation)
}

/// 粒子播放的行，只由种子和行数决定
pub fn random_row(seed: u32, animation: &SpriteSheetGridAnimation) -> u32 {
    Random::new(seed.wrapping_add(PARTICLE_ROW_VARIATION)).get_range(0, animation.num_rows)
}
