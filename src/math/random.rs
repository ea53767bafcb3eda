//! 确定性随机数源
//!
//! 由32位种子构造，同一种子总是产生同一序列。粒子的每个随机属性都从
//! 粒子种子派生，不依赖任何全局状态。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 确定性随机数生成器
#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
}

impl Random {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed as u64),
        }
    }

    /// 重新设置种子
    pub fn set_seed(&mut self, seed: u32) {
        self.rng = StdRng::seed_from_u64(seed as u64);
    }

    pub fn get(&mut self) -> u32 {
        self.rng.gen()
    }

    /// `[0, 1)` 区间内的浮点数
    pub fn get_unorm(&mut self) -> f32 {
        self.rng.gen()
    }

    /// `[min, max)` 区间内的整数；区间为空时返回 `min`
    pub fn get_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }

        self.rng.gen_range(min..max)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0)
    }
}
