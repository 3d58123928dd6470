use std::cell::RefCell;
use std::rc::Rc;

use crate::api::ContactListener;
use crate::collider::{ColliderHandle, ColliderPair};

/// Enter/exit transition for one collider pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContactEvent {
    Enter(ColliderPair),
    Exit(ColliderPair),
}

impl ContactEvent {
    pub fn pair(self) -> ColliderPair {
        match self {
            ContactEvent::Enter(p) | ContactEvent::Exit(p) => p,
        }
    }

    pub fn is_enter(self) -> bool {
        matches!(self, ContactEvent::Enter(_))
    }
}

/// Listener that buffers events for later draining.
///
/// Cloning yields another handle to the same buffer: register one clone
/// with the world and keep the other to read events back.
#[derive(Clone, Debug, Default)]
pub struct ContactLog {
    events: Rc<RefCell<Vec<ContactEvent>>>,
}

impl ContactLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered events, oldest first.
    pub fn drain(&self) -> Vec<ContactEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl ContactListener for ContactLog {
    fn on_enter(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.events.borrow_mut().push(ContactEvent::Enter(ColliderPair::new(a, b)));
    }

    fn on_exit(&mut self, a: ColliderHandle, b: ColliderHandle) {
        self.events.borrow_mut().push(ContactEvent::Exit(ColliderPair::new(a, b)));
    }
}
