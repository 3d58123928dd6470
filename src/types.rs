use glam::Vec2;
use thiserror::Error;

use crate::collider::ColliderHandle;
use crate::slot::SlotError;

/// Errors surfaced by world entity operations. `tick` never returns these.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum WorldError {
    #[error(transparent)]
    Slot(#[from] SlotError),
    /// Mass must be finite and strictly positive.
    #[error("invalid body mass {0}")]
    InvalidMass(f32),
    /// Radius must be finite and strictly positive.
    #[error("invalid collider radius {0}")]
    InvalidRadius(f32),
}

/// World-level configuration.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Uniform acceleration applied to every live body before integration.
    pub gravity: Vec2,
    /// Enable internal timing instrumentation (adds small overhead when true).
    pub enable_timing: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { gravity: Vec2::ZERO, enable_timing: false }
    }
}

/// Overlap contact result between two circles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Overlap {
    /// Unit normal pointing from B towards A; (0,0) for coincident centers.
    pub normal: Vec2,
    /// Penetration depth (>= 0; exactly 0 when the circles just touch).
    pub depth: f32,
    /// Point on A's surface facing B.
    pub contact: Vec2,
}

/// Ray / segment hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Ray parameter of the first hit (`origin + dir * toi`).
    pub toi: f32,
    pub normal: Vec2,
    pub contact: Vec2,
}

/// Closest collider hit returned by a world raycast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColliderHit {
    pub collider: ColliderHandle,
    pub hit: RayHit,
}

/// Debug statistics for the last completed tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub bodies: usize,
    pub colliders: usize,
    /// Colliders whose body handle still resolved during detection.
    pub eligible_colliders: usize,
    /// Narrowphase tests run (n*(n-1)/2 over eligible colliders).
    pub pair_tests: usize,
    pub active_pairs: usize,
}

/// Timing breakdown for the last tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorldTiming {
    pub tick_ms: f64,
    pub integrate_ms: f64,
    pub detect_ms: f64,
    pub dispatch_ms: f64,

    pub enters: usize,
    pub exits: usize,
}
