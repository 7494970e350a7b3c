use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};

/// Surfaces currently bound to a live player.
///
/// Shared between every player that may target the same surfaces; clones
/// see the same set. Only records the binding, the surface itself stays
/// owned by the page.
pub struct SurfaceRegistry<S> {
    bound: Rc<RefCell<Vec<S>>>,
}

impl<S> Clone for SurfaceRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            bound: self.bound.clone(),
        }
    }
}

impl<S> Default for SurfaceRegistry<S> {
    fn default() -> Self {
        Self {
            bound: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<S: PartialEq> SurfaceRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, surface: S) -> Result<()> {
        let mut bound = self.bound.borrow_mut();
        if bound.contains(&surface) {
            return Err(Error::AlreadyBound);
        }
        bound.push(surface);
        Ok(())
    }

    /// Returns whether the surface was bound.
    pub fn release(&self, surface: &S) -> bool {
        let mut bound = self.bound.borrow_mut();
        match bound.iter().position(|s| s == surface) {
            Some(i) => {
                bound.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn is_bound(&self, surface: &S) -> bool {
        self.bound.borrow().contains(surface)
    }

    pub fn len(&self) -> usize {
        self.bound.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.borrow().is_empty()
    }
}
