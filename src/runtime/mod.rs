//! The seams to the host-controlled runtime.
//!
//! Nothing about the runtime's internals is visible here. An instance is
//! four capabilities, a bootstrap is one asynchronous operation with two
//! outcomes. Both are traits so the browser implementation in
//! [`crate::web`] can be swapped for a fake in tests.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::config::PlayerConfig;
use crate::diagnostics::Relay;
use crate::error::Result;
use crate::protocol::Message;

/// Which drawable surface to attach to.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceTarget<S> {
    /// A surface the page already has.
    Handle(S),
    /// A locator to resolve, e.g. a CSS selector.
    Locator(String),
}

impl<S> SurfaceTarget<S> {
    pub fn locator(locator: impl Into<String>) -> Self {
        SurfaceTarget::Locator(locator.into())
    }
}

/// A live runtime instance.
pub trait RuntimeInstance: 'static {
    type Surface: Clone + PartialEq + 'static;

    /// Fire and forget. There is no reply and no delivery acknowledgement.
    fn send_message(&self, message: &Message);

    fn set_fullscreen(&self, enabled: bool);

    /// Ask the runtime to shut down and release its resources.
    fn quit(&self) -> LocalBoxFuture<'static, std::result::Result<(), String>>;

    /// The surface the runtime is currently painting into.
    fn surface(&self) -> Option<Self::Surface>;
}

/// Fetches and runs the bootstrap script, producing an instance.
pub trait Bootstrap {
    type Instance: RuntimeInstance;

    fn resolve_surface(&self, locator: &str) -> Result<<Self::Instance as RuntimeInstance>::Surface>;

    /// Start the runtime on `surface`. The runtime reports its output and
    /// load progress through `relay`.
    fn launch(
        &self,
        config: Rc<PlayerConfig>,
        surface: <Self::Instance as RuntimeInstance>::Surface,
        relay: Relay,
    ) -> LocalBoxFuture<'static, std::result::Result<Self::Instance, String>>;
}
