//! # Game Engine Particles
//!
//! Particle evolution core for the game engine: structure-of-arrays particle
//! buffers advanced each frame by an ordered list of evolvers.
//!
//! ## Features
//!
//! - **Texture Animation**: Sprite sheet frame selection driven by particle age, with optional per-particle rows
//! - **Collisions**: Plane collisions and world-geometry collisions through batched raycasts
//! - **Physics**: Rapier-backed scene queries behind the [`physics::PhysicsQuery`] seam
//! - **ECS Integration**: [`particles::ParticleSystem`] component and a Bevy ECS system driving it
//! - **Configuration**: TOML/JSON configuration with environment overrides
//!
//! ### Example
//!
//! ```ignore
//! use game_engine_particles::config::ParticleSystemConfig;
//! use game_engine_particles::particles::ParticleSystem;
//!
//! let config = ParticleSystemConfig::from_toml_file("particles.toml")?;
//! let mut system = ParticleSystem::from_config(&config)?;
//! system.spawn(16, Vec3::Y, Vec3::ZERO, 2.0)?;
//! system.evolve(1.0 / 60.0, Mat4::IDENTITY, None);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors and logging
//! - [`config`]: Configuration system
//! - [`ecs`]: Transform and time for the ECS integration
//! - [`math`]: Geometry helpers and deterministic random numbers
//! - [`particles`]: Particle set, evolvers and the particle system
//! - [`physics`]: Physics scene queries

/// Errors, logging and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// ECS components and resources used by the particle system
pub mod ecs;
/// Geometry and random number helpers
pub mod math;
/// Particle set, evolvers and the particle system
pub mod particles;
/// Physics scene queries using Rapier
pub mod physics;

pub use crate::core::{init_logging, ParticleError, ParticleResult};
pub use config::ParticleSystemConfig;
pub use particles::{
    particle_evolve_system, ParticleCollisions, ParticleEvolver, ParticleSet, ParticleSystem,
    ParticleTextureAnimation,
};
