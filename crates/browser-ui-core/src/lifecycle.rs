//! Mount-scoped ownership
//!
//! [`MountScope`] tells late async results whether the view that started
//! them is still mounted. [`HandleSlot`] holds the single transport handle
//! of a mount: it can be filled once, and is emptied only by surrendering it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{Error, Result};

/// Liveness flag shared between a mounted view and its async tasks
#[derive(Debug, Clone)]
pub struct MountScope {
    active: Rc<Cell<bool>>,
}

impl MountScope {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Rc::new(Cell::new(true)),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Mark the mount as ended; every clone observes it
    pub fn end(&self) {
        self.active.set(false);
    }
}

impl Default for MountScope {
    fn default() -> Self {
        Self::new()
    }
}

enum SlotState<T: ?Sized> {
    Empty,
    Live(Rc<T>),
    Surrendered,
}

/// Create-once slot for the transport handle of one mount
pub struct HandleSlot<T: ?Sized> {
    state: Rc<RefCell<SlotState<T>>>,
}

impl<T: ?Sized> Clone for HandleSlot<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: ?Sized> Default for HandleSlot<T> {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(SlotState::Empty)),
        }
    }
}

impl<T: ?Sized> HandleSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the slot; the factory only runs when nothing was ever installed
    pub fn install<F>(&self, factory: F) -> Result<Rc<T>>
    where
        F: FnOnce() -> Result<Rc<T>>,
    {
        if !matches!(*self.state.borrow(), SlotState::Empty) {
            return Err(Error::HandleAlreadyCreated);
        }
        let handle = factory()?;
        *self.state.borrow_mut() = SlotState::Live(Rc::clone(&handle));
        Ok(handle)
    }

    /// The live handle, if any
    #[must_use]
    pub fn get(&self) -> Option<Rc<T>> {
        match &*self.state.borrow() {
            SlotState::Live(handle) => Some(Rc::clone(handle)),
            SlotState::Empty | SlotState::Surrendered => None,
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(*self.state.borrow(), SlotState::Live(_))
    }

    /// Give up the handle for teardown; the slot can never be refilled
    pub fn surrender(&self) -> Option<Rc<T>> {
        let previous = std::mem::replace(&mut *self.state.borrow_mut(), SlotState::Surrendered);
        match previous {
            SlotState::Live(handle) => Some(handle),
            SlotState::Empty | SlotState::Surrendered => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_end_is_shared() {
        let scope = MountScope::new();
        let task_view = scope.clone();
        assert!(task_view.is_active());
        scope.end();
        assert!(!task_view.is_active());
    }

    #[test]
    fn test_install_once() {
        let slot: HandleSlot<String> = HandleSlot::new();
        let first = slot.install(|| Ok(Rc::new("first".to_string()))).unwrap();
        assert_eq!(*first, "first");

        let mut factory_ran = false;
        let second = slot.install(|| {
            factory_ran = true;
            Ok(Rc::new("second".to_string()))
        });
        assert!(matches!(second, Err(Error::HandleAlreadyCreated)));
        assert!(!factory_ran);
        assert_eq!(*slot.get().unwrap(), "first");
    }

    #[test]
    fn test_failed_factory_leaves_slot_empty() {
        let slot: HandleSlot<String> = HandleSlot::new();
        assert!(slot.install(|| Err(Error::transport("bad url"))).is_err());
        assert!(!slot.is_live());
        assert!(slot.install(|| Ok(Rc::new("retry".to_string()))).is_ok());
    }

    #[test]
    fn test_surrender_is_final() {
        let slot: HandleSlot<String> = HandleSlot::new();
        slot.install(|| Ok(Rc::new("live".to_string()))).unwrap();

        assert_eq!(*slot.surrender().unwrap(), "live");
        assert!(slot.surrender().is_none());
        assert!(slot.get().is_none());
        assert!(matches!(
            slot.install(|| Ok(Rc::new("again".to_string()))),
            Err(Error::HandleAlreadyCreated)
        ));
    }

    #[test]
    fn test_works_with_trait_objects() {
        let slot: HandleSlot<dyn std::fmt::Debug> = HandleSlot::new();
        slot.install(|| Ok(Rc::new(42_u8) as Rc<dyn std::fmt::Debug>)).unwrap();
        assert_eq!(format!("{:?}", slot.get().unwrap()), "42");
    }
}
