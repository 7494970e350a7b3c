//! Test doubles for the runtime seams: an in-memory instance that journals
//! every call, and a bootstrap whose outcome is scripted. A gated bootstrap
//! keeps its launch pending until the test opens the gate.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use player_embed::diagnostics::Relay;
use player_embed::{
    Bootstrap, Error, Message, Player, PlayerConfig, Result, RuntimeInstance, SurfaceRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Message(Message),
    Fullscreen(bool),
    Quit,
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

pub struct FakeInstance {
    canvas: Canvas,
    journal: Journal,
    quit_result: std::result::Result<(), String>,
}

impl RuntimeInstance for FakeInstance {
    type Surface = Canvas;

    fn send_message(&self, message: &Message) {
        self.journal.borrow_mut().push(Call::Message(message.clone()));
    }

    fn set_fullscreen(&self, enabled: bool) {
        self.journal.borrow_mut().push(Call::Fullscreen(enabled));
    }

    fn quit(&self) -> LocalBoxFuture<'static, std::result::Result<(), String>> {
        self.journal.borrow_mut().push(Call::Quit);
        future::ready(self.quit_result.clone()).boxed_local()
    }

    fn surface(&self) -> Option<Canvas> {
        Some(self.canvas)
    }
}

pub struct FakeBootstrap {
    outcome: std::result::Result<(), String>,
    quit_result: std::result::Result<(), String>,
    /// `(is_error, line)` emitted while loading.
    emit: Vec<(bool, &'static str)>,
    journal: Journal,
    relay: RefCell<Option<Relay>>,
    launches: Cell<usize>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl FakeBootstrap {
    pub fn succeeding() -> Self {
        Self {
            outcome: Ok(()),
            quit_result: Ok(()),
            emit: Vec::new(),
            journal: Journal::default(),
            relay: RefCell::new(None),
            launches: Cell::new(0),
            gate: RefCell::new(None),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            ..Self::succeeding()
        }
    }

    pub fn with_quit_error(mut self, reason: &str) -> Self {
        self.quit_result = Err(reason.to_string());
        self
    }

    pub fn emitting(mut self, lines: &[(bool, &'static str)]) -> Self {
        self.emit = lines.to_vec();
        self
    }

    /// The next launch stays pending until the returned sender fires (or is
    /// dropped).
    pub fn gated(self) -> (Self, oneshot::Sender<()>) {
        let (open, gate) = oneshot::channel();
        *self.gate.borrow_mut() = Some(gate);
        (self, open)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    pub fn quit_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Quit).count()
    }

    pub fn launches(&self) -> usize {
        self.launches.get()
    }

    /// The relay handed to the most recent launch.
    pub fn relay(&self) -> Relay {
        self.relay
            .borrow()
            .clone()
            .expect("bootstrap was never launched")
    }
}

impl Bootstrap for FakeBootstrap {
    type Instance = FakeInstance;

    fn resolve_surface(&self, locator: &str) -> Result<Canvas> {
        locator
            .strip_prefix("#canvas-")
            .and_then(|n| n.parse().ok())
            .map(Canvas)
            .ok_or_else(|| Error::SurfaceNotFound(locator.to_string()))
    }

    fn launch(
        &self,
        _config: Rc<PlayerConfig>,
        surface: Canvas,
        relay: Relay,
    ) -> LocalBoxFuture<'static, std::result::Result<FakeInstance, String>> {
        self.launches.set(self.launches.get() + 1);
        *self.relay.borrow_mut() = Some(relay.clone());

        let emit = self.emit.clone();
        let outcome = self.outcome.clone();
        let journal = self.journal.clone();
        let quit_result = self.quit_result.clone();
        let gate = self.gate.borrow_mut().take();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            for (is_error, line) in emit {
                if is_error {
                    relay.error(line);
                } else {
                    relay.info(line);
                }
            }
            relay.progress(0.5);
            outcome.map(|()| FakeInstance {
                canvas: surface,
                journal,
                quit_result,
            })
        }
        .boxed_local()
    }
}

pub fn config() -> PlayerConfig {
    PlayerConfig::new(
        "Build/demo.loader.js",
        "Build/demo.data",
        "Build/demo.framework.js",
        "Build/demo.wasm",
    )
}

/// A config whose sinks record `info:<line>` / `error:<line>`.
pub fn recording_config() -> (PlayerConfig, Rc<RefCell<Vec<String>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let info = seen.clone();
    let error = seen.clone();
    let config = config()
        .with_print(move |m| info.borrow_mut().push(format!("info:{m}")))
        .with_print_err(move |m| error.borrow_mut().push(format!("error:{m}")));
    (config, seen)
}

pub fn player(registry: &SurfaceRegistry<Canvas>) -> Player<FakeInstance> {
    Player::new(registry.clone())
}
