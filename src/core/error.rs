//! 统一错误处理模块
//!
//! 粒子演化本身不会失败（缺失材质、退化射线等情况都按降级处理），
//! 这里只覆盖粒子缓冲区管理和配置加载这两类可失败的接口。

use crate::config::ConfigError;
use thiserror::Error;

/// 粒子子系统错误类型
#[derive(Error, Debug)]
pub enum ParticleError {
    #[error("Particle index out of range: {index} >= {count}")]
    InvalidIndex { index: u32, count: u32 },

    #[error("Particle capacity exceeded: requested {requested}, max {max}")]
    CapacityExceeded { requested: u32, max: u32 },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// 粒子结果类型别名
pub type ParticleResult<T> = Result<T, ParticleError>;
