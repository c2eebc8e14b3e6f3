//! LoadCoordinator - Single-Flight Resource Loading
//!
//! At most one load is ever applied; a newer request supersedes the one
//! in flight by cancelling its token. Cancellation is cooperative: the
//! token is polled after the loader's suspension point, never enforced
//! preemptively, so no locking is involved.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::eventing::app_event::AppEvent;
use crate::eventing::bus::EventBus;
use crate::domain::scene::{LoadedModel, ModelResource};
use crate::services::capabilities::ModelLoader;
use crate::state::store::StateStore;
use crate::state::viewer_state::StatePatch;

/// Cooperative cancellation token for one load
///
/// Exactly one token is current at a time; minting a new one cancels the
/// previous. Tokens are shared with the load future and discarded once
/// the load settles.
#[derive(Debug)]
pub struct LoadToken {
    id: u64,
    cancelled: Cell<bool>,
}

impl LoadToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Read-only load counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadDiagnostics {
    /// Loads started
    pub started: u64,
    /// Loads whose result was applied to the store
    pub applied: u64,
    /// Loads that failed while still current
    pub failed: u64,
    /// Loads silently discarded after supersession
    pub aborted: u64,
}

/// Orchestrates asynchronous loads against the state store
pub struct LoadCoordinator {
    bus: Rc<EventBus>,
    store: Rc<StateStore>,
    loader: Rc<dyn ModelLoader>,
    current: RefCell<Option<Rc<LoadToken>>>,
    next_token_id: Cell<u64>,
    stats: Cell<LoadDiagnostics>,
}

impl LoadCoordinator {
    pub fn new(bus: Rc<EventBus>, store: Rc<StateStore>, loader: Rc<dyn ModelLoader>) -> Self {
        Self {
            bus,
            store,
            loader,
            current: RefCell::new(None),
            next_token_id: Cell::new(0),
            stats: Cell::new(LoadDiagnostics::default()),
        }
    }

    /// Request a load, superseding any load currently in flight
    ///
    /// N overlapping requests settle as at most one `LoadCompleted` or
    /// `LoadFailed` (carrying the newest request's outcome) and 0..N-1
    /// silent aborts. An aborted load mutates nothing and publishes
    /// nothing: the superseding request already represents user intent.
    pub async fn request_load(&self, resource: ModelResource) {
        let token = self.begin(&resource);

        let outcome = self.loader.load(&resource).await;

        if token.is_cancelled() {
            tracing::debug!(resource = %resource, token = token.id(), "load superseded, discarding result");
            self.bump(|stats| stats.aborted += 1);
            return;
        }

        match outcome {
            Ok(scene) => {
                let scene = Arc::new(scene);
                tracing::info!(resource = %resource, items = scene.item_count(), "load applied");
                self.store.set_state(StatePatch::default().model(Some(LoadedModel {
                    resource: resource.clone(),
                    scene: scene.clone(),
                })));
                self.bus.publish(AppEvent::LoadCompleted { resource, scene });
                self.bump(|stats| stats.applied += 1);
            }
            Err(error) => {
                // Previous model, if any, stays applied.
                tracing::warn!(resource = %resource, %error, "load failed");
                self.bus.publish(AppEvent::LoadFailed {
                    resource,
                    error: error.to_string().into(),
                });
                self.bump(|stats| stats.failed += 1);
            }
        }

        self.finish(&token);
    }

    /// Check whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Read-only load counters
    pub fn diagnostics(&self) -> LoadDiagnostics {
        self.stats.get()
    }

    /// Mint the new current token, cancelling the previous one
    fn begin(&self, resource: &ModelResource) -> Rc<LoadToken> {
        let id = self.next_token_id.get();
        self.next_token_id.set(id + 1);
        let token = Rc::new(LoadToken {
            id,
            cancelled: Cell::new(false),
        });

        if let Some(previous) = self.current.borrow_mut().replace(token.clone()) {
            tracing::debug!(superseded = previous.id(), by = token.id(), "cancelling in-flight load");
            previous.cancel();
        }

        self.bump(|stats| stats.started += 1);
        self.bus.publish(AppEvent::LoadStarted {
            resource: resource.clone(),
        });
        token
    }

    /// Clear the in-flight marker, but only for the still-current token
    ///
    /// A stale completion must never mark the coordinator idle while a
    /// newer load is running.
    fn finish(&self, token: &Rc<LoadToken>) {
        let mut current = self.current.borrow_mut();
        if current.as_ref().is_some_and(|cur| cur.id == token.id) {
            *current = None;
        }
    }

    fn bump(&self, update: impl FnOnce(&mut LoadDiagnostics)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl std::fmt::Debug for LoadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadCoordinator")
            .field("loading", &self.is_loading())
            .field("stats", &self.diagnostics())
            .finish()
    }
}
