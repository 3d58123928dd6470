use crate::body::BodyHandle;
use crate::slot::{CanBeInvalid, Handle};

/// Handle to a [`Collider`] stored in a world.
pub type ColliderHandle = Handle<Collider>;

/// Circle trigger attached to a body.
///
/// The collider does not own its body. Once the body handle goes stale the
/// collider is skipped by detection even though its own slot stays occupied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collider {
    body: BodyHandle,
    radius: f32,
}

impl Collider {
    pub fn new(body: BodyHandle, radius: f32) -> Self {
        Self { body, radius }
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    // Crate-only: a non-positive radius would turn a live slot into a free one
    // without bumping its generation.
    pub(crate) fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }
}

impl CanBeInvalid for Collider {
    fn is_invalid(&self) -> bool {
        !(self.radius > 0.0)
    }

    fn make_invalid() -> Self {
        Collider { body: Handle::from_raw_parts(u32::MAX, u32::MAX), radius: -1.0 }
    }
}

/// Unordered collider pair.
///
/// Stored normalized (`a <= b`), so `{a, b}` and `{b, a}` compare, order and
/// hash identically with plain derives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderPair {
    a: ColliderHandle,
    b: ColliderHandle,
}

impl ColliderPair {
    pub fn new(a: ColliderHandle, b: ColliderHandle) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Lower handle of the pair.
    pub fn a(self) -> ColliderHandle {
        self.a
    }

    /// Higher handle of the pair.
    pub fn b(self) -> ColliderHandle {
        self.b
    }

    pub fn contains(self, h: ColliderHandle) -> bool {
        self.a == h || self.b == h
    }

    /// The member that is not `h`, if `h` belongs to the pair.
    pub fn other(self, h: ColliderHandle) -> Option<ColliderHandle> {
        if self.a == h {
            Some(self.b)
        } else if self.b == h {
            Some(self.a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    fn h(i: u32, g: u32) -> ColliderHandle {
        Handle::from_raw_parts(i, g)
    }

    #[test]
    fn test_pair_symmetry() {
        let p = ColliderPair::new(h(3, 0), h(1, 2));
        let q = ColliderPair::new(h(1, 2), h(3, 0));
        assert_eq!(p, q);
        assert_eq!(p.a(), h(1, 2));
        assert_eq!(p.b(), h(3, 0));

        let hashed: HashSet<_> = [p, q].into_iter().collect();
        assert_eq!(hashed.len(), 1);
        let ordered: BTreeSet<_> = [p, q].into_iter().collect();
        assert_eq!(ordered.len(), 1);
    }

    #[test]
    fn test_pairs_differ_by_generation() {
        let p = ColliderPair::new(h(0, 0), h(1, 0));
        let q = ColliderPair::new(h(0, 1), h(1, 0));
        assert_ne!(p, q);
    }

    #[test]
    fn test_other() {
        let p = ColliderPair::new(h(0, 0), h(4, 0));
        assert_eq!(p.other(h(0, 0)), Some(h(4, 0)));
        assert_eq!(p.other(h(4, 0)), Some(h(0, 0)));
        assert_eq!(p.other(h(2, 0)), None);
        assert!(p.contains(h(4, 0)));
    }

    #[test]
    fn test_collider_sentinel() {
        assert!(Collider::make_invalid().is_invalid());
        assert!(!Collider::new(Handle::from_raw_parts(0, 0), 1.0).is_invalid());
    }
}
