//! 粒子模块
//!
//! SoA粒子集合、演化器（纹理动画、碰撞）以及驱动它们的粒子系统组件。

pub mod collisions;
pub mod evolver;
pub mod material;
pub mod raycast;
pub mod scratch;
pub mod set;
pub mod state;
pub mod system;
pub mod texture_animation;

// 重新导出主要类型
pub use collisions::{
    calc_collision_response, ParticleCollisionMode, ParticleCollisions, ParticleCollisionsDesc,
};
pub use evolver::{EvolveContext, ParticleEvolver};
pub use material::{
    Material, ParticleMaterial, SpriteSheetGridAnimation, SpriteTexture, SPRITE_TEXTURE_PARAM,
};
pub use raycast::{group_raycast, ParticleHitInfo};
pub use scratch::{ParticleScratch, ScratchBuffer, ScratchGuard};
pub use set::{ParticleSet, ParticleSetData};
pub use state::ParticleSystemState;
pub use system::{particle_evolve_system, ParticleSystem};
pub use texture_animation::{
    ParticleTextureAnimation, ParticleTextureAnimationDesc, PARTICLE_ROW_VARIATION,
};
