//! The instance lifecycle manager.
//!
//! ```text
//! Idle --create--> Loading --settle--> Running --quit--> Quitting --> Terminated
//!                     |    \                                ^
//!                     |     `--bootstrap error--> Failed    |
//!                     `------------------quit---------------'
//! ```
//!
//! Everything runs on one thread. State lives behind a single `RefCell` and
//! is never borrowed across an `.await`, so a command issued while `create`
//! or `quit` is pending sees a settled state and fails deterministically
//! instead of racing the transition.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};

use super::registry::SurfaceRegistry;
use super::state::State;
use crate::config::PlayerConfig;
use crate::diagnostics::Relay;
use crate::error::{Error, Result};
use crate::protocol::{Message, MessageParam};
use crate::runtime::{Bootstrap, RuntimeInstance, SurfaceTarget};

type SharedOutcome = Shared<LocalBoxFuture<'static, Result<()>>>;

struct Inner<I: RuntimeInstance> {
    state: State,
    config: Option<Rc<PlayerConfig>>,
    surface: Option<I::Surface>,
    instance: Option<Rc<I>>,
    relay: Option<Relay>,
    /// Launch plus settlement. Shared so a quit issued during loading can
    /// drive the bootstrap itself when nobody awaits the [`Creation`].
    settlement: Option<SharedOutcome>,
    teardown: Option<SharedOutcome>,
}

impl<I: RuntimeInstance> Inner<I> {
    fn transition(&mut self, to: State) {
        log::debug!("player {} -> {}", self.state, to);
        self.state = to;
    }

    /// Drop the binding and stop relaying. Safe to call more than once.
    fn detach(&mut self, registry: &SurfaceRegistry<I::Surface>) {
        if let Some(surface) = self.surface.take() {
            registry.release(&surface);
            log::debug!("surface detached");
        }
        if let Some(relay) = &self.relay {
            relay.close();
        }
    }
}

/// Drives one opaque runtime instance from creation to teardown.
///
/// Cheap to clone; clones drive the same instance.
pub struct Player<I: RuntimeInstance> {
    inner: Rc<RefCell<Inner<I>>>,
    registry: SurfaceRegistry<I::Surface>,
}

impl<I: RuntimeInstance> Clone for Player<I> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<I: RuntimeInstance> Player<I> {
    pub fn new(registry: SurfaceRegistry<I::Surface>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state: State::Idle,
                config: None,
                surface: None,
                instance: None,
                relay: None,
                settlement: None,
                teardown: None,
            })),
            registry,
        }
    }

    pub fn state(&self) -> State {
        self.inner.borrow().state
    }

    pub fn config(&self) -> Option<Rc<PlayerConfig>> {
        self.inner.borrow().config.clone()
    }

    /// The surface this player holds a binding for, if any.
    pub fn surface(&self) -> Option<I::Surface> {
        self.inner.borrow().surface.clone()
    }

    /// The surface the running instance reports it is painting into.
    pub fn instance_surface(&self) -> Option<I::Surface> {
        let instance = self.inner.borrow().instance.clone();
        instance.and_then(|i| i.surface())
    }

    /// Load progress in `[0, 1]`; `0` before `create`.
    pub fn progress(&self) -> f64 {
        self.inner
            .borrow()
            .relay
            .as_ref()
            .map_or(0.0, Relay::current_progress)
    }

    /// Validate, bind the surface and start loading.
    ///
    /// Configuration and binding errors come back synchronously and leave
    /// the player `Idle`. Otherwise the player is `Loading` on return and the
    /// returned [`Creation`] settles it to `Running` or `Failed`; it has to be
    /// awaited (or spawned) for that to happen, unless a [`Player::quit`]
    /// drives the bootstrap instead.
    pub fn create<B>(
        &self,
        config: PlayerConfig,
        target: SurfaceTarget<I::Surface>,
        bootstrap: &B,
    ) -> Result<Creation>
    where
        B: Bootstrap<Instance = I>,
    {
        let state = self.state();
        if state != State::Idle {
            return Err(Error::InvalidTransition {
                operation: "create",
                state,
            });
        }

        config.validate()?;
        let surface = match target {
            SurfaceTarget::Handle(surface) => surface,
            SurfaceTarget::Locator(locator) => bootstrap.resolve_surface(&locator)?,
        };
        self.registry.bind(surface.clone())?;

        let config = Rc::new(config);
        let relay = Relay::new(config.diagnostics().clone());
        log::debug!(
            "creating player from {} with {:?}",
            config.loader_url,
            config.context_attributes()
        );
        {
            let mut inner = self.inner.borrow_mut();
            inner.config = Some(config.clone());
            inner.surface = Some(surface.clone());
            inner.relay = Some(relay.clone());
            inner.transition(State::Loading);
        }

        let launch = bootstrap.launch(config, surface, relay);
        let player = self.clone();
        let settlement = async move {
            let outcome = launch.await;
            player.settle(outcome)
        }
        .boxed_local()
        .shared();
        self.inner.borrow_mut().settlement = Some(settlement.clone());

        let player = self.clone();
        Ok(Creation {
            future: async move {
                let result = settlement.await;
                // A quit issued meanwhile finishes before creation reports.
                let teardown = player.inner.borrow().teardown.clone();
                if let Some(teardown) = teardown {
                    // The teardown result belongs to whoever called quit.
                    let _ = teardown.await;
                }
                result
            }
            .boxed_local(),
        })
    }

    /// Record the bootstrap outcome. A player already `Quitting` keeps its
    /// state and leaves the instance for the pending teardown to release.
    fn settle(&self, outcome: std::result::Result<I, String>) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let quitting = !inner.state.is_live();
        match outcome {
            Ok(instance) => {
                inner.instance = Some(Rc::new(instance));
                if quitting {
                    return Ok(());
                }
                if let Some(relay) = &inner.relay {
                    relay.progress(1.0);
                }
                inner.transition(State::Running);
                Ok(())
            }
            Err(reason) => {
                log::warn!("bootstrap failed: {reason}");
                if !quitting {
                    inner.detach(&self.registry);
                    inner.transition(State::Failed);
                }
                Err(Error::Bootstrap(reason))
            }
        }
    }

    /// Queue a command for the runtime. Only valid while `Running`.
    pub fn send_message(
        &self,
        object: &str,
        method: &str,
        param: impl Into<MessageParam>,
    ) -> Result<()> {
        let instance = self.running_instance()?;
        let message = Message::new(object, method, param)?;
        log::trace!("send {message}");
        instance.send_message(&message);
        Ok(())
    }

    pub fn set_fullscreen(&self, enabled: bool) -> Result<()> {
        let instance = self.running_instance()?;
        log::trace!("fullscreen {enabled}");
        instance.set_fullscreen(enabled);
        Ok(())
    }

    /// Tear the instance down.
    ///
    /// From `Running` or `Loading` the player is `Quitting` on return; a quit
    /// during loading waits for the bootstrap to settle (driving it if the
    /// [`Creation`] was dropped), then releases whatever it produced. The surface is detached before `Terminated` is
    /// observable, even when the runtime reports a teardown error.
    ///
    /// Once a teardown has started, every further call returns the same
    /// shared outcome without touching the runtime again.
    pub fn quit(&self) -> Teardown {
        let mut inner = self.inner.borrow_mut();
        if let Some(teardown) = &inner.teardown {
            return Teardown::shared(teardown.clone());
        }

        let state = inner.state;
        if !state.is_live() {
            return Teardown::rejected(Error::InvalidTransition {
                operation: "quit",
                state,
            });
        }
        // Still loading: settle the bootstrap first, driving it from here if
        // the creation is not being awaited.
        let settlement = match state {
            State::Loading => inner.settlement.clone(),
            _ => None,
        };
        inner.transition(State::Quitting);

        let player = self.clone();
        let teardown = async move {
            if let Some(settlement) = settlement {
                // A failed bootstrap leaves nothing to release.
                let _ = settlement.await;
            }
            // Taken on first poll so no borrow is held while the runtime runs
            // its own callbacks.
            let instance = player.inner.borrow().instance.clone();
            let released = match instance {
                Some(instance) => instance.quit().await,
                None => Ok(()),
            };
            player.finish_teardown(released)
        }
        .boxed_local()
        .shared();
        inner.teardown = Some(teardown.clone());
        Teardown::shared(teardown)
    }

    fn finish_teardown(&self, released: std::result::Result<(), String>) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.instance = None;
        inner.detach(&self.registry);
        inner.transition(State::Terminated);
        released.map_err(|reason| {
            log::warn!("teardown failed: {reason}");
            Error::Teardown(reason)
        })
    }

    fn running_instance(&self) -> Result<Rc<I>> {
        let inner = self.inner.borrow();
        match (&inner.instance, inner.state) {
            (Some(instance), State::Running) => Ok(instance.clone()),
            (_, state) => Err(Error::NotRunning { state }),
        }
    }
}

/// Pending completion of [`Player::create`].
#[must_use = "the player stays Loading until the creation is driven to completion"]
pub struct Creation {
    future: LocalBoxFuture<'static, Result<()>>,
}

impl Future for Creation {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.poll_unpin(cx)
    }
}

/// Pending completion of [`Player::quit`].
#[must_use = "the player stays Quitting until the teardown is driven to completion"]
pub struct Teardown {
    future: LocalBoxFuture<'static, Result<()>>,
}

impl Teardown {
    fn shared(teardown: SharedOutcome) -> Self {
        Self {
            future: teardown.boxed_local(),
        }
    }

    fn rejected(error: Error) -> Self {
        Self {
            future: future::ready(Err(error)).boxed_local(),
        }
    }
}

impl Future for Teardown {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.poll_unpin(cx)
    }
}
