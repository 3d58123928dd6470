use glam::Vec2;

use crate::slot::{CanBeInvalid, Handle};

/// Handle to a [`Body`] stored in a world.
pub type BodyHandle = Handle<Body>;

/// Point mass integrated with explicit Euler.
///
/// A body with `mass <= 0` (or NaN) is the removed-slot sentinel: it is
/// never integrated and never paired.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
    position: Vec2,
    velocity: Vec2,
    accumulated_force: Vec2,
    mass: f32,
}

impl Body {
    /// Body at rest at the origin. Validation of `mass` happens in the world.
    pub fn new(mass: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            accumulated_force: Vec2::ZERO,
            mass,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn accumulated_force(&self) -> Vec2 {
        self.accumulated_force
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Add `force` to this tick's accumulator; summed until the next integrate.
    pub fn apply_force(&mut self, force: Vec2) {
        self.accumulated_force += force;
    }

    /// Instant velocity change of `impulse / mass`. No-op on an invalid body.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.is_invalid() {
            return;
        }
        self.velocity += impulse / self.mass;
    }

    /// `a = F/m; v += a*dt; x += v*dt; F = 0`.
    pub fn integrate(&mut self, dt: f32) {
        if self.is_invalid() {
            self.accumulated_force = Vec2::ZERO;
            return;
        }
        let acceleration = self.accumulated_force / self.mass;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
        self.accumulated_force = Vec2::ZERO;
    }
}

impl CanBeInvalid for Body {
    fn is_invalid(&self) -> bool {
        // Written as a negation so NaN mass also counts as invalid.
        !(self.mass > 0.0)
    }

    fn make_invalid() -> Self {
        Body::new(-1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_scenario() {
        let mut b = Body::new(2.0);
        b.apply_force(Vec2::new(4.0, 0.0));
        b.integrate(1.0);
        assert_eq!(b.velocity(), Vec2::new(2.0, 0.0));
        assert_eq!(b.position(), Vec2::new(2.0, 0.0));
        assert_eq!(b.accumulated_force(), Vec2::ZERO);
    }

    #[test]
    fn test_forces_accumulate_within_a_tick() {
        let mut b = Body::new(1.0);
        b.apply_force(Vec2::new(1.0, 0.0));
        b.apply_force(Vec2::new(2.0, 3.0));
        assert_eq!(b.accumulated_force(), Vec2::new(3.0, 3.0));
        b.integrate(0.5);
        assert_eq!(b.velocity(), Vec2::new(1.5, 1.5));
        assert_eq!(b.position(), Vec2::new(0.75, 0.75));
    }

    #[test]
    fn test_velocity_carries_between_ticks() {
        let mut b = Body::new(1.0)
            .with_position(Vec2::new(10.0, 5.0))
            .with_velocity(Vec2::new(1.0, -1.0));
        assert_eq!(b.position(), Vec2::new(10.0, 5.0));
        b.integrate(1.0);
        b.integrate(1.0);
        assert_eq!(b.position(), Vec2::new(12.0, 3.0));
        assert_eq!(b.velocity(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_invalid_body_does_not_produce_nan() {
        let mut b = Body::new(0.0);
        assert!(b.is_invalid());
        b.apply_force(Vec2::new(1.0, 1.0));
        b.apply_impulse(Vec2::new(1.0, 1.0));
        b.integrate(1.0);
        assert_eq!(b.position(), Vec2::ZERO);
        assert_eq!(b.velocity(), Vec2::ZERO);
        assert!(Body::new(f32::NAN).is_invalid());
        assert!(Body::make_invalid().is_invalid());
    }

    #[test]
    fn test_impulse() {
        let mut b = Body::new(4.0);
        b.apply_impulse(Vec2::new(8.0, 0.0));
        assert_eq!(b.velocity(), Vec2::new(2.0, 0.0));
    }
}
