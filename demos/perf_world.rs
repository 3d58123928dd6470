use glam::Vec2;
use std::time::Instant;
use tripwire::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn main() {
    let mut world = TriggerWorld::new(WorldConfig { enable_timing: true, ..Default::default() });

    let n = 2_000usize; // number of colliders
    let ticks = 30;
    let mut seed = 1u32;
    for _ in 0..n {
        let rx = (lcg(&mut seed) as f32 / u32::MAX as f32) * 200.0 - 100.0;
        let ry = (lcg(&mut seed) as f32 / u32::MAX as f32) * 200.0 - 100.0;
        let vx = (lcg(&mut seed) as f32 / u32::MAX as f32) * 4.0 - 2.0;
        let vy = (lcg(&mut seed) as f32 / u32::MAX as f32) * 4.0 - 2.0;
        let Ok(b) = world.add_body(1.0) else { continue };
        if let Ok(body) = world.body_mut(b) {
            body.set_position(Vec2::new(rx, ry));
            body.set_velocity(Vec2::new(vx, vy));
        }
        let _ = world.add_collider(b, 0.5);
    }

    let t0 = Instant::now();
    let (mut enters, mut exits) = (0usize, 0usize);
    for _ in 0..ticks {
        world.tick(1.0 / 60.0);
        if let Some(t) = world.timing() {
            enters += t.enters;
            exits += t.exits;
        }
    }
    let total = t0.elapsed();

    let stats = world.debug_stats();
    if let Some(t) = world.timing() {
        println!(
            "N={} ticks={} total={:?} last: tick={:.3}ms (integrate={:.3}ms detect={:.3}ms dispatch={:.3}ms) pair_tests={} active={} enters={} exits={}",
            n,
            ticks,
            total,
            t.tick_ms,
            t.integrate_ms,
            t.detect_ms,
            t.dispatch_ms,
            stats.pair_tests,
            stats.active_pairs,
            enters,
            exits
        );
    } else {
        println!("N={} ticks={} total={:?} active={}", n, ticks, total, stats.active_pairs);
    }
}
