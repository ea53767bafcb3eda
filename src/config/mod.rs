//! 粒子系统配置
//!
//! 提供TOML/JSON配置文件和环境变量覆盖

use crate::impl_default;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub mod evolvers;

pub use evolvers::{CollisionsConfig, EvolverConfig};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 粒子系统配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemConfig {
    /// 粒子是否在世界空间模拟
    pub world_space: bool,

    /// 粒子数上限
    pub max_particles: u32,

    /// 系统随机数种子，决定每个粒子的种子
    pub seed: u32,

    /// 演化器，按顺序执行
    pub evolvers: Vec<EvolverConfig>,

    /// 日志配置
    pub logging: LoggingConfig,
}

impl_default!(ParticleSystemConfig {
    world_space: true,
    max_particles: 1000,
    seed: 0,
    evolvers: Vec::new(),
    logging: LoggingConfig::default(),
});

impl ParticleSystemConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("PARTICLES_WORLD_SPACE") {
            self.world_space = val.parse().unwrap_or(self.world_space);
        }
        if let Ok(val) = env::var("PARTICLES_MAX_PARTICLES") {
            if let Ok(max_particles) = val.parse() {
                self.max_particles = max_particles;
            }
        }
        if let Ok(val) = env::var("PARTICLES_SEED") {
            if let Ok(seed) = val.parse() {
                self.seed = seed;
            }
        }
        if let Ok(val) = env::var("PARTICLES_LOG_LEVEL") {
            match val.parse() {
                Ok(level) => self.logging.level = level,
                Err(e) => tracing::warn!(target: "config", "Ignoring PARTICLES_LOG_LEVEL: {}", e),
            }
        }
    }

    /// 验证配置
    ///
    /// 演化器参数越界不算错误，构造演化器时会被限制到合法范围。
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_particles == 0 {
            return Err(ConfigError::ValidationError(
                "max_particles must be greater than 0".to_string(),
            ));
        }

        for (i, evolver) in self.evolvers.iter().enumerate() {
            evolver
                .validate()
                .map_err(|reason| ConfigError::ValidationError(format!("evolver {}: {}", i, reason)))?;
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_console: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::ParseError(format!("unknown log level '{}'", other))),
        }
    }
}

/// 物理层掩码的序列化
///
/// TOML整数是有符号64位，全1掩码放不下，因此写成十六进制字符串；
/// 读取时同时接受整数和字符串。
pub mod layer_mask {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LayerRepr {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(layer: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:#x}", layer))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match LayerRepr::deserialize(deserializer)? {
            LayerRepr::Number(layer) => Ok(layer),
            LayerRepr::Text(text) => parse(&text).map_err(serde::de::Error::custom),
        }
    }

    pub fn parse(text: &str) -> Result<u64, std::num::ParseIntError> {
        let text = text.trim();
        match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => text.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::collisions::ParticleCollisionMode;

    const SAMPLE_TOML: &str = r#"
world_space = false
max_particles = 500
seed = 7

[[evolvers]]
type = "collisions"
mode = "world"
restitution = 0.5
dampening = 2.0
layer = "0xff"

[[evolvers]]
type = "texture_animation"
randomize_row = true
num_cycles = 3

[logging]
level = "debug"
log_to_console = false
"#;

    #[test]
    fn test_default_config() {
        let config = ParticleSystemConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.world_space);
    }

    #[test]
    fn test_parse_toml() {
        let config = ParticleSystemConfig::from_toml_str(SAMPLE_TOML).unwrap();

        assert!(!config.world_space);
        assert_eq!(config.max_particles, 500);
        assert_eq!(config.seed, 7);
        assert_eq!(config.evolvers.len(), 2);
        assert_eq!(config.logging.level, LogLevel::Debug);

        match &config.evolvers[0] {
            EvolverConfig::Collisions(collisions) => {
                assert_eq!(collisions.desc.mode, ParticleCollisionMode::World);
                assert_eq!(collisions.desc.layer, 0xff);
                // 解析时保留原值，构造演化器时再限制
                assert_eq!(collisions.desc.dampening, 2.0);
                assert!(collisions.planes.is_empty());
            }
            other => panic!("unexpected evolver {:?}", other),
        }
        match &config.evolvers[1] {
            EvolverConfig::TextureAnimation(desc) => {
                assert!(desc.randomize_row);
                assert_eq!(desc.num_cycles, 3);
            }
            other => panic!("unexpected evolver {:?}", other),
        }
    }

    #[test]
    fn test_toml_serialization() {
        let config = ParticleSystemConfig::from_toml_str(SAMPLE_TOML).unwrap();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed = ParticleSystemConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(config.evolvers, parsed.evolvers);
    }

    #[test]
    fn test_json_serialization() {
        let mut config = ParticleSystemConfig::default();
        config.evolvers.push(EvolverConfig::Collisions(CollisionsConfig::default()));
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed = ParticleSystemConfig::from_json_str(&json_str).unwrap();
        assert_eq!(config.evolvers, parsed.evolvers);
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = ParticleSystemConfig::from_toml_str(SAMPLE_TOML).unwrap();

        let toml_path = dir.path().join("particles.toml");
        config.save_toml(&toml_path).unwrap();
        let from_toml = ParticleSystemConfig::from_toml_file(&toml_path).unwrap();
        assert_eq!(from_toml.max_particles, 500);

        let json_path = dir.path().join("particles.json");
        config.save_json(&json_path).unwrap();
        let from_json = ParticleSystemConfig::from_json_file(&json_path).unwrap();
        assert_eq!(from_json.evolvers, config.evolvers);
    }

    #[test]
    fn test_missing_file() {
        let result = ParticleSystemConfig::from_toml_file("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_validation() {
        let mut config = ParticleSystemConfig::default();
        config.max_particles = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = ParticleSystemConfig::default();
        config.evolvers.push(EvolverConfig::Collisions(CollisionsConfig {
            planes: vec![[0.0, 0.0, 0.0, 1.0]],
            ..Default::default()
        }));
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ParticleSystemConfig::default();
        env::set_var("PARTICLES_MAX_PARTICLES", "4096");
        env::set_var("PARTICLES_LOG_LEVEL", "WARN");
        config.apply_env_overrides();
        env::remove_var("PARTICLES_MAX_PARTICLES");
        env::remove_var("PARTICLES_LOG_LEVEL");

        assert_eq!(config.max_particles, 4096);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_layer_mask_parse() {
        assert_eq!(layer_mask::parse("0xffffffffffffffff").unwrap(), u64::MAX);
        assert_eq!(layer_mask::parse("12").unwrap(), 12);
        assert!(layer_mask::parse("0xzz").is_err());
    }
}
