//! tripwire: generational slot storage plus a circle trigger world
//! (point-mass integration, O(n²) overlap scan, enter/exit contact events)

pub mod slot;
pub mod body;
pub mod collider;
pub mod types;
pub mod api;
pub mod events;
pub mod world;
pub mod narrowphase;

pub use crate::slot::{CanBeInvalid, Handle, SlotAllocator, SlotError};
pub use crate::body::{Body, BodyHandle};
pub use crate::collider::{Collider, ColliderHandle, ColliderPair};
pub use crate::types::*;
pub use crate::api::*;
pub use crate::events::{ContactEvent, ContactLog};
pub use crate::world::TriggerWorld;
