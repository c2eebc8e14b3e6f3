//! ViewerHub - Coordination Context
//!
//! Explicitly constructed context object owning the bus, store,
//! coordinator, and synchronizer, with the standing subscriptions that
//! connect them. Replaces the implicit global app instance of older
//! viewer builds; lifecycle is `new` / `dispose`, never module load
//! order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::eventing::app_event::{AppEvent, EventKind};
use crate::eventing::bus::{EventBus, SubscriptionHandle};
use crate::domain::config::CoreConfig;
use crate::domain::intent::SelectIntent;
use crate::domain::scene::{ModelResource, ScreenPoint};
use crate::error::Result;
use crate::services::capabilities::{HighlightMode, ModelLoader, Renderer, ScenePicker};
use crate::services::load_coordinator::LoadCoordinator;
use crate::services::selection_sync::SelectionSynchronizer;
use crate::state::store::StateStore;
use crate::state::viewer_state::StateKey;

/// Central context for the coordination core
///
/// UI collaborators reach coordination exclusively through the exposed
/// capabilities and the bus; nothing outside the hub mutates the store,
/// the bindings, or the subscriber list directly.
pub struct ViewerHub {
    bus: Rc<EventBus>,
    store: Rc<StateStore>,
    coordinator: Rc<LoadCoordinator>,
    selection: Rc<SelectionSynchronizer>,
    picker: RefCell<Option<Rc<dyn ScenePicker>>>,
    subscriptions: RefCell<Vec<SubscriptionHandle>>,
    disposed: Cell<bool>,
}

impl ViewerHub {
    /// Construct the core and wire its standing subscriptions
    pub fn new(config: &CoreConfig, loader: Rc<dyn ModelLoader>) -> Result<Self> {
        let bus = Rc::new(EventBus::new(config.queue_capacity)?);
        let store = Rc::new(StateStore::new(bus.clone()));
        let coordinator = Rc::new(LoadCoordinator::new(bus.clone(), store.clone(), loader));
        let selection = Rc::new(SelectionSynchronizer::new(
            bus.clone(),
            store.clone(),
            config.pick_debounce_ms,
        ));

        let hub = Self {
            bus,
            store,
            coordinator,
            selection,
            picker: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
        };
        hub.wire();
        tracing::info!("viewer hub initialized");
        Ok(hub)
    }

    /// Standing subscriptions: completed loads rebuild the bindings,
    /// raw intents route to the synchronizer
    fn wire(&self) {
        let selection = self.selection.clone();
        let on_load = self.bus.subscribe(EventKind::LoadCompleted, move |event| {
            if let AppEvent::LoadCompleted { scene, .. } = &event.payload {
                selection.bind_scene(scene);
            }
            Ok(())
        });

        let selection = self.selection.clone();
        let on_intent = self.bus.subscribe(EventKind::SelectRequested, move |event| {
            if let AppEvent::SelectRequested { intent } = &event.payload {
                selection.request_select(intent.clone());
            }
            Ok(())
        });

        self.subscriptions.borrow_mut().extend([on_load, on_intent]);
    }

    /// Attach the spatial picker used by `pick_and_select`
    pub fn attach_picker(&self, picker: Rc<dyn ScenePicker>) {
        *self.picker.borrow_mut() = Some(picker);
    }

    /// Attach a renderer; selection changes drive its highlights
    ///
    /// Subscribes key-filtered on `Selection`, so model-only changes cost
    /// the renderer nothing.
    pub fn attach_renderer(&self, renderer: Rc<dyn Renderer>) {
        let selection = self.selection.clone();
        let handle = self.store.subscribe(Some(vec![StateKey::Selection]), move |change| {
            for id in change.previous.selection.selected_ids() {
                if !change.current.selection.is_selected(id) {
                    if let Some(object) = selection.object_for(id) {
                        renderer.highlight(&object, HighlightMode::None);
                    }
                }
            }
            for id in change.current.selection.selected_ids() {
                if !change.previous.selection.is_selected(id) {
                    if let Some(object) = selection.object_for(id) {
                        renderer.highlight(&object, HighlightMode::Selected);
                    }
                }
            }
            Ok(())
        });
        self.subscriptions.borrow_mut().push(handle);
    }

    /// Load a resource, superseding any load in flight
    pub async fn request_load(&self, resource: ModelResource) {
        self.coordinator.request_load(resource).await;
    }

    /// Route a selection intent to the synchronizer
    pub fn request_select(&self, intent: SelectIntent) {
        self.selection.request_select(intent);
    }

    /// Resolve a screen point through the picker and select the result
    ///
    /// A pick that hits no geometry clears the selection.
    pub fn pick_and_select(&self, point: ScreenPoint, click_ts_ms: u64) {
        let picker = self.picker.borrow().clone();
        let Some(picker) = picker else {
            tracing::warn!("pick requested but no picker attached");
            return;
        };
        let intent = match picker.pick(point) {
            Some(object) => SelectIntent::from_pick(object, click_ts_ms),
            None => SelectIntent::from_miss(click_ts_ms),
        };
        self.selection.request_select(intent);
    }

    /// The bus, for external subscribe/publish
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// The store, for snapshots and key-filtered subscriptions
    pub fn store(&self) -> &Rc<StateStore> {
        &self.store
    }

    /// The coordinator, for load diagnostics
    pub fn coordinator(&self) -> &Rc<LoadCoordinator> {
        &self.coordinator
    }

    /// The synchronizer, for selection diagnostics and binding lookups
    pub fn selection(&self) -> &Rc<SelectionSynchronizer> {
        &self.selection
    }

    /// Drop the standing subscriptions; idempotent
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        for handle in self.subscriptions.borrow_mut().drain(..) {
            handle.unsubscribe();
        }
        *self.picker.borrow_mut() = None;
        tracing::info!("viewer hub disposed");
    }
}

impl std::fmt::Debug for ViewerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerHub")
            .field("disposed", &self.disposed.get())
            .field("loading", &self.coordinator.is_loading())
            .finish()
    }
}
