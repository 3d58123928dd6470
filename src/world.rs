use glam::Vec2;

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::api::{ContactListener, NarrowphaseApi, TriggerWorldApi};
use crate::body::{Body, BodyHandle};
use crate::collider::{Collider, ColliderHandle, ColliderPair};
use crate::narrowphase::Narrowphase;
use crate::slot::SlotAllocator;
use crate::types::*;

/// Persistent trigger world: bodies, circle colliders and the set of pairs
/// that overlapped on the previous tick.
pub struct TriggerWorld {
    pub cfg: WorldConfig,
    pub tick_counter: u64,

    bodies: SlotAllocator<Body>,
    colliders: SlotAllocator<Collider>,
    active_pairs: BTreeSet<ColliderPair>,
    listener: Option<Box<dyn ContactListener>>,

    last_stats: WorldStats,
    last_timing: Option<WorldTiming>,
}

/// Collider snapshot used by detection and queries.
#[derive(Copy, Clone)]
struct Eligible {
    handle: ColliderHandle,
    center: Vec2,
    radius: f32,
}

impl TriggerWorldApi for TriggerWorld {
    fn new(cfg: WorldConfig) -> Self {
        Self {
            cfg,
            tick_counter: 0,
            bodies: SlotAllocator::new(),
            colliders: SlotAllocator::new(),
            active_pairs: BTreeSet::new(),
            listener: None,
            last_stats: WorldStats::default(),
            last_timing: None,
        }
    }

    fn add_body(&mut self, mass: f32) -> Result<BodyHandle, WorldError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(WorldError::InvalidMass(mass));
        }
        let h = self.bodies.add(Body::new(mass));
        debug!(body = ?h, mass, "body added");
        Ok(h)
    }

    fn body(&self, h: BodyHandle) -> Result<&Body, WorldError> {
        Ok(self.bodies.get(h)?)
    }

    fn body_mut(&mut self, h: BodyHandle) -> Result<&mut Body, WorldError> {
        Ok(self.bodies.get_mut(h)?)
    }

    fn remove_body(&mut self, h: BodyHandle) -> Result<Body, WorldError> {
        let body = self.bodies.remove(h)?;
        debug!(body = ?h, "body removed");
        Ok(body)
    }

    fn apply_force(&mut self, h: BodyHandle, force: Vec2) -> Result<(), WorldError> {
        self.bodies.get_mut(h)?.apply_force(force);
        Ok(())
    }

    fn set_velocity(&mut self, h: BodyHandle, velocity: Vec2) -> Result<(), WorldError> {
        self.bodies.get_mut(h)?.set_velocity(velocity);
        Ok(())
    }

    fn add_collider(&mut self, body: BodyHandle, radius: f32) -> Result<ColliderHandle, WorldError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(WorldError::InvalidRadius(radius));
        }
        self.bodies.get(body)?;
        let h = self.colliders.add(Collider::new(body, radius));
        debug!(collider = ?h, body = ?body, radius, "collider added");
        Ok(h)
    }

    fn collider(&self, h: ColliderHandle) -> Result<&Collider, WorldError> {
        Ok(self.colliders.get(h)?)
    }

    fn remove_collider(&mut self, h: ColliderHandle) -> Result<Collider, WorldError> {
        let collider = self.colliders.remove(h)?;
        debug!(collider = ?h, "collider removed");
        Ok(collider)
    }

    fn set_contact_listener(
        &mut self,
        listener: Box<dyn ContactListener>,
    ) -> Option<Box<dyn ContactListener>> {
        self.listener.replace(listener)
    }

    fn clear_contact_listener(&mut self) -> Option<Box<dyn ContactListener>> {
        self.listener.take()
    }

    fn tick(&mut self, dt: f32) {
        let t_all = if self.cfg.enable_timing { Some(Instant::now()) } else { None };

        let t0 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        if dt.is_finite() && dt > 0.0 {
            self.integrate(dt);
        } else {
            warn!(dt, "skipping integration for non-positive or non-finite dt");
        }
        let integrate_ms = t0.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);

        // The full new set is built before any diffing.
        let t1 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let new_pairs = self.detect_pairs();
        let detect_ms = t1.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);

        let t2 = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let (enters, exits) = self.dispatch(&new_pairs);
        self.active_pairs = new_pairs;
        let dispatch_ms = t2.map(|t| t.elapsed().as_secs_f64() * 1000.0).unwrap_or(0.0);

        self.last_stats.active_pairs = self.active_pairs.len();
        self.tick_counter = self.tick_counter.wrapping_add(1);
        trace!(
            tick = self.tick_counter,
            enters,
            exits,
            active = self.active_pairs.len(),
            "tick complete"
        );

        self.last_timing = t_all.map(|t| WorldTiming {
            tick_ms: t.elapsed().as_secs_f64() * 1000.0,
            integrate_ms,
            detect_ms,
            dispatch_ms,
            enters,
            exits,
        });
    }

    fn query_point(&self, p: Vec2) -> Vec<ColliderHandle> {
        self.eligible()
            .filter(|e| Narrowphase::overlap_point_circle(p, e.center, e.radius))
            .map(|e| e.handle)
            .collect()
    }

    fn query_circle(&self, center: Vec2, radius: f32) -> Vec<ColliderHandle> {
        self.eligible()
            .filter(|e| Narrowphase::overlap_circle_circle(center, radius, e.center, e.radius).is_some())
            .map(|e| e.handle)
            .collect()
    }

    fn raycast(&self, origin: Vec2, dir: Vec2, max_t: f32) -> Option<ColliderHit> {
        if dir.length_squared() == 0.0 {
            return None;
        }
        let mut best: Option<ColliderHit> = None;
        for e in self.eligible() {
            let Some(hit) = Narrowphase::ray_circle(origin, dir, e.center, e.radius) else { continue };
            if hit.toi > max_t {
                continue;
            }
            match &best {
                Some(b) if hit.toi >= b.hit.toi => {}
                _ => best = Some(ColliderHit { collider: e.handle, hit }),
            }
        }
        best
    }

    fn overlap_pair(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Overlap> {
        let ea = self.resolve(a)?;
        let eb = self.resolve(b)?;
        Narrowphase::overlap_circle_circle(ea.center, ea.radius, eb.center, eb.radius)
    }

    fn is_touching(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.active_pairs.contains(&ColliderPair::new(a, b))
    }

    fn active_pairs(&self) -> Vec<ColliderPair> {
        self.active_pairs.iter().copied().collect()
    }

    fn contacts_of(&self, h: ColliderHandle) -> Vec<ColliderHandle> {
        self.active_pairs.iter().filter_map(|p| p.other(h)).collect()
    }
}

impl TriggerWorld {
    /// Change a collider's radius; rejects non-positive or non-finite values.
    pub fn set_collider_radius(&mut self, h: ColliderHandle, radius: f32) -> Result<(), WorldError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(WorldError::InvalidRadius(radius));
        }
        self.colliders.get_mut(h)?.set_radius(radius);
        Ok(())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Live bodies in ascending slot order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    /// Live colliders in ascending slot order, including ones whose body is gone.
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> + '_ {
        self.colliders.iter()
    }

    /// Return debug stats for the last tick.
    pub fn debug_stats(&self) -> WorldStats {
        WorldStats {
            bodies: self.bodies.len(),
            colliders: self.colliders.len(),
            ..self.last_stats
        }
    }

    /// Return timing breakdown for the last `tick` (when `enable_timing` is set).
    pub fn timing(&self) -> Option<WorldTiming> {
        self.last_timing
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.cfg.gravity;
        for (_, body) in self.bodies.iter_mut() {
            if gravity != Vec2::ZERO {
                let weight = gravity * body.mass();
                body.apply_force(weight);
            }
            body.integrate(dt);
        }
    }

    /// Colliders whose body handle still resolves, in ascending slot order.
    fn eligible(&self) -> impl Iterator<Item = Eligible> + '_ {
        self.colliders.iter().filter_map(move |(handle, c)| {
            let body = self.bodies.get(c.body()).ok()?;
            Some(Eligible { handle, center: body.position(), radius: c.radius() })
        })
    }

    fn resolve(&self, h: ColliderHandle) -> Option<Eligible> {
        let c = self.colliders.get(h).ok()?;
        let body = self.bodies.get(c.body()).ok()?;
        Some(Eligible { handle: h, center: body.position(), radius: c.radius() })
    }

    fn detect_pairs(&mut self) -> BTreeSet<ColliderPair> {
        let live: Vec<Eligible> = self.eligible().collect();
        let mut pairs = BTreeSet::new();
        let mut pair_tests = 0usize;
        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                pair_tests += 1;
                if Narrowphase::overlap_circle_circle(a.center, a.radius, b.center, b.radius).is_some() {
                    pairs.insert(ColliderPair::new(a.handle, b.handle));
                }
            }
        }
        self.last_stats.eligible_colliders = live.len();
        self.last_stats.pair_tests = pair_tests;
        pairs
    }

    /// Notify enters then exits; returns `(enters, exits)`.
    fn dispatch(&mut self, new_pairs: &BTreeSet<ColliderPair>) -> (usize, usize) {
        let listener = &mut self.listener;
        let mut enters = 0;
        for pair in new_pairs.difference(&self.active_pairs) {
            enters += 1;
            trace!(a = ?pair.a(), b = ?pair.b(), "trigger enter");
            if let Some(l) = listener.as_deref_mut() {
                l.on_enter(pair.a(), pair.b());
            }
        }
        let mut exits = 0;
        for pair in self.active_pairs.difference(new_pairs) {
            exits += 1;
            trace!(a = ?pair.a(), b = ?pair.b(), "trigger exit");
            if let Some(l) = listener.as_deref_mut() {
                l.on_exit(pair.a(), pair.b());
            }
        }
        (enters, exits)
    }
}
