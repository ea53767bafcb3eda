//! 材质与精灵图接口
//!
//! 纹理动画只需要从材质中查到精灵图的网格动画描述，材质资源本身的加载
//! 由外部负责。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 纹理动画读取的精灵图参数名
pub const SPRITE_TEXTURE_PARAM: &str = "gTexture";

/// 精灵图网格动画描述
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpriteSheetGridAnimation {
    /// 行数
    pub num_rows: u32,
    /// 列数
    pub num_columns: u32,
    /// 播放帧率
    pub fps: u32,
    /// 总帧数
    pub count: u32,
}

impl SpriteSheetGridAnimation {
    pub fn new(num_rows: u32, num_columns: u32, count: u32) -> Self {
        Self {
            num_rows,
            num_columns,
            fps: 8,
            count,
        }
    }

    /// 三个维度都大于0才可用
    pub fn is_valid(&self) -> bool {
        self.num_rows > 0 && self.num_columns > 0 && self.count > 0
    }
}

/// 精灵图
#[derive(Debug, Clone, Default)]
pub struct SpriteTexture {
    pub animation: SpriteSheetGridAnimation,
    /// 纹理资源是否已加载
    pub loaded: bool,
}

impl SpriteTexture {
    pub fn new(animation: SpriteSheetGridAnimation) -> Self {
        Self {
            animation,
            loaded: true,
        }
    }
}

/// 粒子材质接口
pub trait ParticleMaterial {
    /// 材质资源是否已加载
    fn is_loaded(&self) -> bool;

    /// 按参数名查找精灵图
    fn sprite_texture(&self, name: &str) -> Option<&SpriteTexture>;
}

/// 内存中的材质
#[derive(Debug, Clone)]
pub struct Material {
    sprite_textures: HashMap<String, SpriteTexture>,
    loaded: bool,
}

impl Material {
    pub fn new() -> Self {
        Self {
            sprite_textures: HashMap::new(),
            loaded: true,
        }
    }

    /// 绑定精灵图
    pub fn with_sprite_texture(mut self, name: &str, texture: SpriteTexture) -> Self {
        self.set_sprite_texture(name, texture);
        self
    }

    pub fn set_sprite_texture(&mut self, name: &str, texture: SpriteTexture) {
        self.sprite_textures.insert(name.to_string(), texture);
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleMaterial for Material {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn sprite_texture(&self, name: &str) -> Option<&SpriteTexture> {
        self.sprite_textures.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_animation_validity() {
        assert!(SpriteSheetGridAnimation::new(2, 4, 8).is_valid());
        assert!(!SpriteSheetGridAnimation::new(0, 4, 8).is_valid());
        assert!(!SpriteSheetGridAnimation::new(2, 0, 8).is_valid());
        assert!(!SpriteSheetGridAnimation::new(2, 4, 0).is_valid());
    }

    #[test]
    fn test_material_lookup() {
        let material = Material::new().with_sprite_texture(
            SPRITE_TEXTURE_PARAM,
            SpriteTexture::new(SpriteSheetGridAnimation::new(1, 4, 4)),
        );

        assert!(material.is_loaded());
        assert!(material.sprite_texture(SPRITE_TEXTURE_PARAM).is_some());
        assert!(material.sprite_texture("gNormal").is_none());
    }
}
