use super::{ConfigError, ConfigResult};
use crate::math::Plane;
use crate::particles::collisions::{ParticleCollisions, ParticleCollisionsDesc};
use crate::particles::evolver::ParticleEvolver;
use crate::particles::texture_animation::{ParticleTextureAnimation, ParticleTextureAnimationDesc};
use serde::{Deserialize, Serialize};

/// 演化器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvolverConfig {
    /// 纹理动画
    TextureAnimation(ParticleTextureAnimationDesc),
    /// 碰撞
    Collisions(CollisionsConfig),
}

/// 碰撞演化器配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionsConfig {
    #[serde(flatten)]
    pub desc: ParticleCollisionsDesc,

    /// 世界空间碰撞平面，`[nx, ny, nz, d]`
    #[serde(default)]
    pub planes: Vec<[f32; 4]>,
}

impl EvolverConfig {
    /// 验证后构造演化器
    ///
    /// 非单位法线在 `Plane::from_array` 中归一化，`d` 按同一比例缩放。
    pub fn to_evolver(&self) -> ConfigResult<ParticleEvolver> {
        self.validate().map_err(ConfigError::ValidationError)?;

        let evolver = match self {
            EvolverConfig::TextureAnimation(desc) => ParticleTextureAnimation::new(*desc).into(),
            EvolverConfig::Collisions(config) => {
                let planes = config.planes.iter().map(|&packed| Plane::from_array(packed)).collect();
                ParticleCollisions::new(config.desc).with_planes(planes).into()
            }
        };
        Ok(evolver)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if let EvolverConfig::Collisions(config) = self {
            for (i, packed) in config.planes.iter().enumerate() {
                if Plane::from_array(*packed).is_degenerate() {
                    return Err(format!("plane {} has a degenerate normal", i));
                }
            }
        }
        Ok(())
    }
}
