use glam::Vec2;

use crate::body::{Body, BodyHandle};
use crate::collider::{Collider, ColliderHandle, ColliderPair};
use crate::types::*;

/// Receives trigger transitions from a world tick.
///
/// `a` is always the lower handle of the pair.
pub trait ContactListener {
    /// Two colliders started overlapping this tick.
    fn on_enter(&mut self, a: ColliderHandle, b: ColliderHandle);
    /// Two colliders stopped overlapping (or one of them went away) this tick.
    fn on_exit(&mut self, a: ColliderHandle, b: ColliderHandle);
}

/// Public API contract for the trigger world.
pub trait TriggerWorldApi {
    /// Construct a new world with the given configuration.
    fn new(cfg: WorldConfig) -> Self
    where
        Self: Sized;

    // --- Bodies ------------------------------------------------------------

    /// Add a body at rest at the origin.
    fn add_body(&mut self, mass: f32) -> Result<BodyHandle, WorldError>;

    fn body(&self, h: BodyHandle) -> Result<&Body, WorldError>;

    fn body_mut(&mut self, h: BodyHandle) -> Result<&mut Body, WorldError>;

    /// Remove a body. Colliders still pointing at it drop out of detection.
    fn remove_body(&mut self, h: BodyHandle) -> Result<Body, WorldError>;

    fn apply_force(&mut self, h: BodyHandle, force: Vec2) -> Result<(), WorldError>;

    fn set_velocity(&mut self, h: BodyHandle, velocity: Vec2) -> Result<(), WorldError>;

    // --- Colliders ---------------------------------------------------------

    /// Attach a circle collider to a live body.
    fn add_collider(&mut self, body: BodyHandle, radius: f32) -> Result<ColliderHandle, WorldError>;

    fn collider(&self, h: ColliderHandle) -> Result<&Collider, WorldError>;

    fn remove_collider(&mut self, h: ColliderHandle) -> Result<Collider, WorldError>;

    // --- Events ------------------------------------------------------------

    /// Register the single listener, returning the one it replaces.
    fn set_contact_listener(
        &mut self,
        listener: Box<dyn ContactListener>,
    ) -> Option<Box<dyn ContactListener>>;

    fn clear_contact_listener(&mut self) -> Option<Box<dyn ContactListener>>;

    // --- Stepping ----------------------------------------------------------

    /// Integrate, detect overlaps, diff against the previous tick and notify.
    fn tick(&mut self, dt: f32);

    // --- Queries -----------------------------------------------------------

    /// Colliders whose circle contains `p`.
    fn query_point(&self, p: Vec2) -> Vec<ColliderHandle>;

    /// Colliders overlapping the given circle.
    fn query_circle(&self, center: Vec2, radius: f32) -> Vec<ColliderHandle>;

    /// Closest collider hit along `origin + dir * t` for `t` in `[0, max_t]`.
    fn raycast(&self, origin: Vec2, dir: Vec2, max_t: f32) -> Option<ColliderHit>;

    /// Current geometric overlap of two colliders (ignores the active set).
    fn overlap_pair(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Overlap>;

    /// True if the pair was overlapping as of the last tick.
    fn is_touching(&self, a: ColliderHandle, b: ColliderHandle) -> bool;

    /// Pairs overlapping as of the last tick, in ascending order.
    fn active_pairs(&self) -> Vec<ColliderPair>;

    /// Colliders paired with `h` as of the last tick.
    fn contacts_of(&self, h: ColliderHandle) -> Vec<ColliderHandle>;
}

/// Primitive intersection tests used by detection and queries.
pub trait NarrowphaseApi {
    /// Closed test: touching circles overlap with depth 0.
    fn overlap_circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> Option<Overlap>;
    fn overlap_point_circle(p: Vec2, c: Vec2, r: f32) -> bool;
    fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, r: f32) -> Option<RayHit>;
    fn line_segment_circle(a: Vec2, b: Vec2, center: Vec2, r: f32) -> Option<RayHit>;
}
