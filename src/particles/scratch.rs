//! 演化过程的临时内存
//!
//! 每种临时数据一个缓冲区。`acquire` 返回的守卫在析构时清空内容，
//! 因此无论从哪条路径返回，临时数据都不会带出一次演化调用；
//! 容量保留给下一帧复用，稳定状态下不再分配。

use crate::math::{LineSegment3, Plane};
use crate::particles::raycast::ParticleHitInfo;
use std::ops::{Deref, DerefMut};

/// 可复用的临时缓冲区
#[derive(Debug)]
pub struct ScratchBuffer<T> {
    storage: Vec<T>,
    in_use: bool,
}

impl<T> ScratchBuffer<T> {
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            in_use: false,
        }
    }

    /// 取得缓冲区，至少预留 `capacity` 个元素
    pub fn acquire(&mut self, capacity: usize) -> ScratchGuard<'_, T> {
        debug_assert!(!self.in_use, "scratch buffer acquired twice");

        self.storage.clear();
        self.storage.reserve(capacity);
        self.in_use = true;
        ScratchGuard { buffer: self }
    }

    /// 是否有守卫尚未释放
    pub fn in_use(&self) -> bool {
        self.in_use
    }

    /// 保留的容量
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// 缓冲区当前内容长度（守卫释放后总为0）
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl<T> Default for ScratchBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 临时缓冲区守卫
pub struct ScratchGuard<'a, T> {
    buffer: &'a mut ScratchBuffer<T>,
}

impl<T> Deref for ScratchGuard<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.buffer.storage
    }
}

impl<T> DerefMut for ScratchGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.buffer.storage
    }
}

impl<T> Drop for ScratchGuard<'_, T> {
    fn drop(&mut self) {
        self.buffer.storage.clear();
        self.buffer.in_use = false;
    }
}

/// 粒子系统持有的全部临时缓冲区
#[derive(Debug, Default)]
pub struct ParticleScratch {
    /// 变换到本地空间的碰撞平面
    pub planes: ScratchBuffer<Plane>,
    /// 每个粒子本帧的运动线段
    pub segments: ScratchBuffer<LineSegment3>,
    /// 射线命中结果
    pub hits: ScratchBuffer<ParticleHitInfo>,
}

impl ParticleScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 没有任何缓冲区被占用且都已清空
    pub fn is_released(&self) -> bool {
        !self.planes.in_use()
            && !self.segments.in_use()
            && !self.hits.in_use()
            && self.planes.is_empty()
            && self.segments.is_empty()
            && self.hits.is_empty()
    }
}
