pub mod calendar;
pub mod config;
pub mod debounce;
pub mod directory;
pub mod display;
pub mod filter;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod share;
pub mod source;
pub mod status;
mod utils;
pub mod wizard;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use config::{AppConfig, ConfigStore};
use debounce::Debouncer;
use directory::{Directory, DirectoryIntent, DirectoryState, Effect};
use display::{EventCard, EventDetail};
use pagination::PageControl;
use wizard::draft::{Field, Pill};
use wizard::preview::Preview;
use wizard::submit::SubmitClient;
use wizard::{CollectionKind, StepControls, Wizard, WizardIntent};

/// Everything the host shell holds on to between calls.
pub struct AppState {
    config: ConfigStore,
    directory: Arc<Mutex<Directory>>,
    wizard: Mutex<Wizard>,
    search: Debouncer<String>,
}

impl AppState {
    /// Must be called inside a tokio runtime: the search debouncer and the
    /// task that applies its settled queries are spawned here.
    pub fn new(config: ConfigStore) -> Self {
        let snapshot = config.read();
        let directory = Arc::new(Mutex::new(Directory::from_config(&snapshot)));
        let (search, mut settled) = Debouncer::spawn(snapshot.search_debounce());

        let target = Arc::clone(&directory);
        tokio::spawn(async move {
            while let Some(query) = settled.recv().await {
                target
                    .lock()
                    .await
                    .dispatch(DirectoryIntent::SetSearch(query), Utc::now());
            }
        });

        Self {
            config,
            directory,
            wizard: Mutex::new(Wizard::new()),
            search,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DirectoryView {
    pub state: DirectoryState,
    pub cards: Vec<EventCard>,
    pub total_pages: usize,
    pub page_controls: Vec<PageControl>,
    pub detail: Option<EventDetail>,
    pub share_link: Option<String>,
    pub no_results: bool,
}

fn directory_view(directory: &Directory) -> DirectoryView {
    DirectoryView {
        state: directory.state().clone(),
        cards: directory.cards(),
        total_pages: directory.total_pages(),
        page_controls: directory.page_controls(),
        detail: directory.detail(),
        share_link: directory.share_link(),
        no_results: directory.shows_no_results(),
    }
}

#[derive(Debug, Serialize)]
pub struct WizardView {
    pub step: u8,
    pub controls: StepControls,
    pub focus: Option<Field>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub completed: bool,
    pub preview: Preview,
    pub pills: BTreeMap<&'static str, Vec<Pill>>,
}

fn wizard_view(wizard: &Wizard) -> WizardView {
    let pills = [
        ("tickets", CollectionKind::Tickets),
        ("sponsors", CollectionKind::Sponsors),
        ("partners", CollectionKind::Partners),
        ("faqs", CollectionKind::Faqs),
        ("contents", CollectionKind::Contents),
    ]
    .into_iter()
    .map(|(key, kind)| (key, wizard.pills(kind)))
    .collect();

    WizardView {
        step: wizard.step(),
        controls: wizard.controls(),
        focus: wizard.focus(),
        error: wizard.error().map(str::to_string),
        notice: wizard.notice().map(str::to_string),
        completed: wizard.is_completed(),
        preview: wizard.preview(),
        pills,
    }
}

pub async fn load_events(state: &AppState) -> Result<DirectoryView, String> {
    let mut directory = state.directory.lock().await;
    directory.load().await;
    Ok(directory_view(&directory))
}

pub async fn directory_dispatch(
    state: &AppState,
    intent: DirectoryIntent,
) -> Result<(Effect, DirectoryView), String> {
    let mut directory = state.directory.lock().await;
    if matches!(intent, DirectoryIntent::ResetFilters) {
        // a query still waiting out the debounce would re-apply the search
        state.search.cancel();
    }
    let effect = directory.dispatch(intent, Utc::now());
    Ok((effect, directory_view(&directory)))
}

pub async fn directory_snapshot(state: &AppState) -> Result<DirectoryView, String> {
    Ok(directory_view(&*state.directory.lock().await))
}

/// Search keystrokes go through the debouncer; the query lands in the
/// directory once typing pauses.
pub fn search_input(state: &AppState, query: String) {
    state.search.push(query);
}

pub async fn wizard_dispatch(state: &AppState, intent: WizardIntent) -> Result<WizardView, String> {
    let mut wizard = state.wizard.lock().await;
    wizard.dispatch(intent);
    Ok(wizard_view(&wizard))
}

pub async fn wizard_snapshot(state: &AppState) -> Result<WizardView, String> {
    Ok(wizard_view(&*state.wizard.lock().await))
}

pub async fn submit_event(state: &AppState) -> Result<WizardView, String> {
    let payload = state.wizard.lock().await.begin_submit();
    let Some(payload) = payload else {
        return wizard_snapshot(state).await;
    };
    let client = SubmitClient::from_config(&state.config.read());
    tracing::info!(endpoint = client.endpoint(), "submitting event listing");
    let outcome = client.submit(&payload).await;

    let mut wizard = state.wizard.lock().await;
    wizard.finish_submit(outcome);
    Ok(wizard_view(&wizard))
}

pub async fn get_config(state: &AppState) -> Result<AppConfig, String> {
    Ok(state.config.read())
}

/// Persists the new config. Directory settings pick it up on the next
/// restart.
pub async fn update_config(state: &AppState, next: AppConfig) -> Result<AppConfig, String> {
    state
        .config
        .update(|config| *config = next)
        .map_err(|err| err.to_string())
}

/// Sets up logging, reads the stored config, and runs the first event load.
pub async fn init() -> Result<AppState, String> {
    logging::init();
    let state = AppState::new(ConfigStore::load());
    let view = load_events(&state).await?;
    tracing::info!(
        events = view.state.events.len(),
        fallback = view.state.used_fallback,
        "directory ready"
    );
    Ok(state)
}
