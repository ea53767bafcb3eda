//! 核心宏定义

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use game_engine_particles::impl_default;
///
/// struct EmitterSettings {
///     max_particles: u32,
///     world_space: bool,
/// }
///
/// impl_default!(EmitterSettings {
///     max_particles: 1000,
///     world_space: true,
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
