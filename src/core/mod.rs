//! 核心模块
//!
//! 包含：
//! - `error` - 错误类型定义
//! - `logging` - 日志初始化
//! - `macros` - 通用宏

pub mod error;
pub mod logging;
#[macro_use]
pub mod macros;

pub use error::{ParticleError, ParticleResult};
pub use logging::init_logging;
