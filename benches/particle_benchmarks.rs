//! 粒子演化性能基准测试
//!
//! 测试平面碰撞、世界几何碰撞和纹理动画在不同粒子数下的性能

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use game_engine_particles::math::Plane;
use game_engine_particles::particles::{
    Material, ParticleCollisionMode, ParticleCollisions, ParticleCollisionsDesc, ParticleSystem,
    ParticleTextureAnimation, ParticleTextureAnimationDesc, SpriteSheetGridAnimation,
    SpriteTexture, SPRITE_TEXTURE_PARAM,
};
use game_engine_particles::physics::PhysicsWorld3D;
use glam::{Mat4, Vec3};
use std::hint::black_box;
use std::sync::Arc;

const PARTICLE_COUNTS: [u32; 3] = [100, 1000, 10000];
const TIME_STEP: f32 = 1.0 / 60.0;

fn spawn_falling(system: &mut ParticleSystem, count: u32) {
    for i in 0..count {
        let x = (i % 100) as f32 * 0.1 - 5.0;
        let z = (i / 100) as f32 * 0.1 - 5.0;
        system
            .spawn(1, Vec3::new(x, 0.55, z), Vec3::new(0.0, -3.0, 0.0), 5.0)
            .expect("benchmark particle count exceeds system capacity");
    }
}

fn bench_plane_collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("plane_collisions");

    for count in PARTICLE_COUNTS.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let planes = vec![
                Plane::from_point_normal(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
                Plane::from_point_normal(Vec3::new(-6.0, 0.0, 0.0), Vec3::X),
                Plane::from_point_normal(Vec3::new(6.0, 0.0, 0.0), Vec3::NEG_X),
            ];
            let collisions = ParticleCollisions::new(ParticleCollisionsDesc::default()).with_planes(planes);
            let mut system = ParticleSystem::new(count).with_evolver(collisions);
            spawn_falling(&mut system, count);

            b.iter(|| {
                system.evolve(black_box(TIME_STEP), Mat4::IDENTITY, None);
            });
        });
    }

    group.finish();
}

fn bench_world_collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_collisions");

    let mut physics = PhysicsWorld3D::new();
    physics.add_static_cuboid(Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0), 0b1);
    for i in 0..8 {
        physics.add_static_ball(Vec3::new(i as f32 - 4.0, 1.0, 0.0), 0.3, 0b1);
    }
    physics.update_queries();

    for count in PARTICLE_COUNTS.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let collisions = ParticleCollisions::new(ParticleCollisionsDesc {
                mode: ParticleCollisionMode::World,
                ..Default::default()
            });
            let mut system = ParticleSystem::new(count).with_evolver(collisions);
            spawn_falling(&mut system, count);

            b.iter(|| {
                system.evolve(black_box(TIME_STEP), Mat4::IDENTITY, Some(&physics));
            });
        });
    }

    group.finish();
}

fn bench_texture_animation(c: &mut Criterion) {
    let mut group = c.benchmark_group("texture_animation");

    let material = Arc::new(Material::new().with_sprite_texture(
        SPRITE_TEXTURE_PARAM,
        SpriteTexture::new(SpriteSheetGridAnimation::new(4, 8, 32)),
    ));

    for randomize_row in [false, true] {
        for count in PARTICLE_COUNTS.iter() {
            let id = BenchmarkId::new(if randomize_row { "random_row" } else { "sequential" }, count);
            group.bench_with_input(id, count, |b, &count| {
                let animation = ParticleTextureAnimation::new(ParticleTextureAnimationDesc {
                    randomize_row,
                    num_cycles: 2,
                });
                let mut system = ParticleSystem::new(count)
                    .with_material(material.clone())
                    .with_evolver(animation);
                spawn_falling(&mut system, count);

                b.iter(|| {
                    system.evolve(black_box(TIME_STEP), Mat4::IDENTITY, None);
                });
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_plane_collisions,
    bench_world_collisions,
    bench_texture_animation
);
criterion_main!(benches);
