//! Bouncing circles in an 800x600 box; a listener tracks which ones overlap.
//!
//! `RUST_LOG=tripwire=trace cargo run --example collider_sample` shows every
//! enter/exit as it is dispatched.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use tracing_subscriber::EnvFilter;
use tripwire::*;

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit(seed: &mut u32) -> f32 {
    lcg(seed) as f32 / u32::MAX as f32
}

/// Per-collider count of current overlaps, shared with the demo loop.
#[derive(Clone, Default)]
struct OverlapCounter {
    counts: Rc<RefCell<HashMap<ColliderHandle, u32>>>,
}

impl ContactListener for OverlapCounter {
    fn on_enter(&mut self, a: ColliderHandle, b: ColliderHandle) {
        let mut counts = self.counts.borrow_mut();
        *counts.entry(a).or_default() += 1;
        *counts.entry(b).or_default() += 1;
    }

    fn on_exit(&mut self, a: ColliderHandle, b: ColliderHandle) {
        let mut counts = self.counts.borrow_mut();
        for h in [a, b] {
            if let Some(n) = counts.get_mut(&h) {
                *n = n.saturating_sub(1);
            }
        }
    }
}

struct Circle {
    body: BodyHandle,
    collider: ColliderHandle,
    radius: f32,
}

fn spawn(world: &mut TriggerWorld, seed: &mut u32, count: usize, max_speed: f32) -> Vec<Circle> {
    let mut circles = Vec::with_capacity(count);
    for _ in 0..count {
        let radius = 8.0 + unit(seed) * 22.0;
        let pos = Vec2::new(50.0 + unit(seed) * (WIDTH - 100.0), 50.0 + unit(seed) * (HEIGHT - 100.0));
        let vel = Vec2::new(unit(seed) * 2.0 - 1.0, unit(seed) * 2.0 - 1.0) * max_speed;
        let Ok(body) = world.add_body(1.0) else { continue };
        if let Ok(b) = world.body_mut(body) {
            b.set_position(pos);
            b.set_velocity(vel);
        }
        let Ok(collider) = world.add_collider(body, radius) else { continue };
        circles.push(Circle { body, collider, radius });
    }
    circles
}

/// Keep circles inside the box by reflecting velocity off the walls.
fn bounce(world: &mut TriggerWorld, circles: &[Circle]) {
    for c in circles {
        let Ok(body) = world.body_mut(c.body) else { continue };
        let mut p = body.position();
        let mut v = body.velocity();
        let r = c.radius;
        if (p.x - r < 0.0 && v.x < 0.0) || (p.x + r > WIDTH && v.x > 0.0) {
            p.x = p.x.clamp(r, WIDTH - r);
            v = narrowphase::reflect(v, Vec2::X);
        }
        if (p.y - r < 0.0 && v.y < 0.0) || (p.y + r > HEIGHT && v.y > 0.0) {
            p.y = p.y.clamp(r, HEIGHT - r);
            v = narrowphase::reflect(v, Vec2::Y);
        }
        body.set_position(p);
        body.set_velocity(v);
    }
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut world = TriggerWorld::new(WorldConfig { enable_timing: true, ..Default::default() });
    let counter = OverlapCounter::default();
    world.set_contact_listener(Box::new(counter.clone()));

    let mut seed = 7u32;
    let mut circles = spawn(&mut world, &mut seed, 30, 150.0);
    let dt = 1.0 / 60.0;

    for frame in 0..600 {
        bounce(&mut world, &circles);
        world.tick(dt);

        if frame % 120 == 0 {
            let counts = counter.counts.borrow();
            let lit = circles
                .iter()
                .filter(|c| counts.get(&c.collider).copied().unwrap_or(0) > 0)
                .count();
            println!(
                "frame {frame:4}: {lit}/{} circles overlapping, {} active pairs",
                circles.len(),
                world.debug_stats().active_pairs
            );
        }

        // Rebuild the set halfway through, like a settings change would.
        if frame == 300 {
            for c in circles.drain(..) {
                let _ = world.remove_collider(c.collider);
                let _ = world.remove_body(c.body);
            }
            circles = spawn(&mut world, &mut seed, 60, 300.0);
            println!("respawned {} circles ({} live bodies)", circles.len(), world.body_count());
        }
    }

    if let Some(t) = world.timing() {
        println!(
            "last tick: {:.3}ms (integrate={:.3}ms detect={:.3}ms dispatch={:.3}ms) enters={} exits={}",
            t.tick_ms, t.integrate_ms, t.detect_ms, t.dispatch_ms, t.enters, t.exits
        );
    }
}
