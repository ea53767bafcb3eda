//! 每帧共享的只读状态

use glam::Mat4;

/// 单帧状态快照，由粒子系统在调用演化器前构造
#[derive(Debug, Clone, Copy)]
pub struct ParticleSystemState {
    /// 本帧时间步长（秒）
    pub time_step: f32,
    /// 粒子是否位于世界空间
    pub world_space: bool,
    pub local_to_world: Mat4,
    pub world_to_local: Mat4,
}

impl ParticleSystemState {
    /// 由本地到世界矩阵构造，世界到本地取其逆
    pub fn new(time_step: f32, world_space: bool, local_to_world: Mat4) -> Self {
        Self {
            time_step,
            world_space,
            local_to_world,
            world_to_local: local_to_world.inverse(),
        }
    }
}

impl Default for ParticleSystemState {
    fn default() -> Self {
        Self::new(0.0, true, Mat4::IDENTITY)
    }
}
