//! Sun, planet and a comet under mutual gravity, with trigger events when
//! the comet grazes either body.

use glam::Vec2;
use tracing_subscriber::EnvFilter;
use tripwire::*;

const G: f32 = 250.0;

struct Planet {
    name: &'static str,
    body: BodyHandle,
    collider: ColliderHandle,
}

fn planet(
    world: &mut TriggerWorld,
    name: &'static str,
    mass: f32,
    radius: f32,
    pos: Vec2,
    vel: Vec2,
) -> Result<Planet, WorldError> {
    let body = world.add_body(mass)?;
    let b = world.body_mut(body)?;
    b.set_position(pos);
    b.set_velocity(vel);
    let collider = world.add_collider(body, radius)?;
    Ok(Planet { name, body, collider })
}

/// Pairwise Newtonian attraction, accumulated before the tick integrates.
fn apply_gravity(world: &mut TriggerWorld, planets: &[Planet]) -> Result<(), WorldError> {
    for (i, a) in planets.iter().enumerate() {
        for b in &planets[i + 1..] {
            let (pa, ma) = {
                let body = world.body(a.body)?;
                (body.position(), body.mass())
            };
            let (pb, mb) = {
                let body = world.body(b.body)?;
                (body.position(), body.mass())
            };
            let delta = pb - pa;
            let dist2 = delta.length_squared();
            let dir = narrowphase::normalize_or_zero(delta);
            let magnitude = if dist2 > 0.0 { G * ma * mb / dist2 } else { 0.0 };
            world.apply_force(a.body, dir * magnitude)?;
            world.apply_force(b.body, -dir * magnitude)?;
        }
    }
    Ok(())
}

struct Reporter {
    names: Vec<(ColliderHandle, &'static str)>,
}

impl Reporter {
    fn name(&self, h: ColliderHandle) -> &'static str {
        self.names.iter().find(|(c, _)| *c == h).map(|(_, n)| *n).unwrap_or("?")
    }
}

impl ContactListener for Reporter {
    fn on_enter(&mut self, a: ColliderHandle, b: ColliderHandle) {
        println!("contact: {} touches {}", self.name(a), self.name(b));
    }

    fn on_exit(&mut self, a: ColliderHandle, b: ColliderHandle) {
        println!("contact: {} leaves {}", self.name(a), self.name(b));
    }
}

fn main() -> Result<(), WorldError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut world = TriggerWorld::new(WorldConfig::default());
    let center = Vec2::new(850.0, 450.0);

    let sun_mass = 5000.0;
    let orbit = 200.0;
    let orbital_speed = (G * sun_mass / orbit).sqrt();
    let planets = vec![
        planet(&mut world, "sun", sun_mass, 50.0, center, Vec2::ZERO)?,
        planet(&mut world, "earth", 10.0, 10.0, center + Vec2::new(orbit, 0.0), Vec2::new(0.0, -orbital_speed))?,
        planet(&mut world, "comet", 0.5, 4.0, center + Vec2::new(-600.0, 120.0), Vec2::new(220.0, 0.0))?,
    ];

    world.set_contact_listener(Box::new(Reporter {
        names: planets.iter().map(|p| (p.collider, p.name)).collect(),
    }));

    let dt = 1.0 / 240.0;
    for step in 0..2400 {
        apply_gravity(&mut world, &planets)?;
        world.tick(dt);
        if step % 480 == 0 {
            for p in &planets {
                let pos = world.body(p.body)?.position() - center;
                println!("t={:5.2}s {:>5} at ({:8.2}, {:8.2})", step as f32 * dt, p.name, pos.x, pos.y);
            }
        }
    }
    Ok(())
}
