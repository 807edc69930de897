//! A live assessment: wizard state plus its autocomplete resources.

use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::Serialize;
use uuid::Uuid;

use crate::analysis::AnalyticsApi;

use super::autocomplete::{FoodItem, SuggestionBoard, SuggestionKey};
use super::listener::{ListenerGuard, PointerDown, PointerHub};
use super::machine::{can_advance, transition, Event, FieldChange, WizardState};
use super::models::{Draft, HealthProfile};

type Catalog = Arc<RwLock<Vec<FoodItem>>>;
type Suggestions = Arc<Mutex<SuggestionBoard>>;

fn board(suggestions: &Mutex<SuggestionBoard>) -> MutexGuard<'_, SuggestionBoard> {
    suggestions.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The wizard while it is on screen.
///
/// Holds the outside-click listener exactly while the wizard is open; the
/// listener is released when the wizard closes or the session is dropped,
/// and acquired again when it reopens.
pub struct WizardSession {
    state: WizardState,
    catalog: Catalog,
    suggestions: Suggestions,
    hub: PointerHub,
    outside_click: Option<ListenerGuard>,
    api: Option<Arc<dyn AnalyticsApi>>,
}

impl WizardSession {
    /// Open the wizard with a fresh draft and attach the outside-click
    /// listener to `hub`.
    pub fn open(hub: &PointerHub) -> Self {
        let mut session = Self {
            state: WizardState::Closed,
            catalog: Arc::default(),
            suggestions: Arc::default(),
            hub: hub.clone(),
            outside_click: None,
            api: None,
        };
        session.apply(Event::Open);
        session
    }

    /// Fetch the food catalog now and again on every reopen. Failures leave
    /// the catalog as it was so suggestions may come back empty; the wizard
    /// is unaffected.
    pub fn load_catalog(&mut self, api: Arc<dyn AnalyticsApi>) {
        self.api = Some(api.clone());
        self.fetch_catalog(api);
    }

    fn fetch_catalog(&self, api: Arc<dyn AnalyticsApi>) {
        let catalog = self.catalog.clone();
        tokio::spawn(async move {
            match api.search_foods().await {
                Ok(items) => {
                    tracing::debug!(items = items.len(), "Food catalog loaded");
                    *catalog.write().unwrap_or_else(PoisonError::into_inner) = items;
                }
                Err(e) => tracing::warn!(error = %e, "Food catalog fetch failed"),
            }
        });
    }

    pub fn set_catalog(&self, items: Vec<FoodItem>) {
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = items;
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Apply an event; returns the profile when the wizard was submitted.
    pub fn apply(&mut self, event: Event) -> Option<HealthProfile> {
        let reopening = matches!(event, Event::Open);
        let state = mem::replace(&mut self.state, WizardState::Closed);
        let result = transition(state, event);
        self.state = result.state;

        if reopening {
            self.attach();
        } else if !self.state.is_open() {
            self.release();
        }
        result.submitted
    }

    /// Close the wizard, discarding the draft.
    pub fn close(&mut self) {
        self.apply(Event::Close);
    }

    /// Start from a clean board with the listener attached and a fresh
    /// catalog on the way.
    fn attach(&mut self) {
        board(&self.suggestions).clear();

        if self.outside_click.is_none() {
            let suggestions = self.suggestions.clone();
            self.outside_click = Some(self.hub.subscribe(move |event: &PointerDown| {
                board(&suggestions).close_except(event.target.as_ref());
            }));
            tracing::debug!("Outside-click listener attached");
        }

        if let Some(api) = self.api.clone() {
            self.fetch_catalog(api);
        }
    }

    fn release(&mut self) {
        board(&self.suggestions).clear();
        if self.outside_click.take().is_some() {
            tracing::debug!("Outside-click listener released");
        }
    }

    /// Record a keystroke in a food-name input and refresh its suggestions.
    pub fn type_food_name(&mut self, key: SuggestionKey, text: &str) -> Vec<FoodItem> {
        let row_exists = self
            .state
            .draft()
            .and_then(|draft| draft.meal_food_list.get(&key.meal))
            .is_some_and(|rows| key.row < rows.len());
        if !row_exists {
            return Vec::new();
        }
        self.apply(Event::FieldChanged {
            change: FieldChange::FoodName {
                meal: key.meal,
                row: key.row,
                name: text.to_string(),
            },
        });

        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        board(&self.suggestions).on_input(key, text, &catalog)
    }

    /// Fill a food row from a chosen suggestion and close its list.
    pub fn choose_food(&mut self, key: SuggestionKey, item: FoodItem) {
        board(&self.suggestions).take(&key);
        self.apply(Event::FieldChanged {
            change: FieldChange::FoodSelected {
                meal: key.meal,
                row: key.row,
                name: item.food_name,
                id: item.public_food_key,
            },
        });
    }

    pub fn suggestions(&self, key: &SuggestionKey) -> Vec<FoodItem> {
        board(&self.suggestions)
            .get(key)
            .map(<[FoodItem]>::to_vec)
            .unwrap_or_default()
    }

    pub fn view(&self, id: Uuid) -> SessionView {
        let draft = self.state.draft().cloned();
        let can_advance = draft
            .as_ref()
            .map(|d| can_advance(d.step, d))
            .unwrap_or(false);
        let is_last_step = draft.as_ref().map(|d| d.step.is_last()).unwrap_or(false);

        SessionView {
            session_id: id,
            open: self.is_open(),
            step_index: draft.as_ref().map(|d| d.step.index()),
            can_advance,
            submit_label: if is_last_step { "Submit" } else { "Next" },
            draft,
            suggestions: board(&self.suggestions).open_lists(),
        }
    }
}

impl std::fmt::Debug for WizardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardSession")
            .field("state", &self.state)
            .field("listening", &self.outside_click.is_some())
            .field("suggestions", &board(&self.suggestions).len())
            .finish_non_exhaustive()
    }
}

impl Drop for WizardSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// What the client needs to render the wizard.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub open: bool,
    pub step_index: Option<usize>,
    pub can_advance: bool,
    /// The submit control reads "Next" until the final step
    pub submit_label: &'static str,
    pub draft: Option<Draft>,
    pub suggestions: std::collections::HashMap<String, Vec<FoodItem>>,
}

/// One client page hosting the wizard: its pointer events and the wizard.
#[derive(Debug)]
pub struct PageSession {
    pub pointer: PointerHub,
    pub wizard: WizardSession,
}

impl PageSession {
    pub fn open() -> Self {
        let pointer = PointerHub::new();
        let wizard = WizardSession::open(&pointer);
        Self { pointer, wizard }
    }

    /// Deliver a pointer press on this page.
    pub fn pointer_down(&self, target: Option<SuggestionKey>) {
        self.pointer.dispatch(&PointerDown { target });
    }
}
