use std::sync::Arc;

use reqwest::Method;
use shared::{
    domain::{Party, PartyId},
    protocol::{extract_created_party, extract_party_list, DateEncoding, EnvelopeKey, PartyForm},
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

use crate::{
    error::{ActionError, ApiError},
    store::PartyStore,
    transport::JsonTransport,
    view::{DisplayNode, ListView, UiAction},
};

pub const DEFAULT_EVENTS_PATH: &str = "/events";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    pub events_path: String,
    pub envelope: EnvelopeKey,
    pub date_encoding: DateEncoding,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            events_path: DEFAULT_EVENTS_PATH.to_string(),
            envelope: EnvelopeKey::default(),
            date_encoding: DateEncoding::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartyEvent {
    ListRendered(Vec<DisplayNode>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The create response echoed the record and it was appended.
    Appended(PartyId),
    /// The response carried no record; the list was fetched again.
    Resynced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    /// Server answered 404; nothing changed locally.
    AlreadyAbsent,
}

/// Binds user actions to API calls, the store and the view.
pub struct PartyController {
    transport: Arc<dyn JsonTransport>,
    options: ControllerOptions,
    store: PartyStore,
    view: ListView,
    events: broadcast::Sender<PartyEvent>,
}

impl PartyController {
    pub fn new(transport: Arc<dyn JsonTransport>, options: ControllerOptions) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            transport,
            options,
            store: PartyStore::new(),
            view: ListView::default(),
            events,
        }
    }

    pub fn store(&self) -> &PartyStore {
        &self.store
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PartyEvent> {
        self.events.subscribe()
    }

    /// Replaces the store with the server's list and re-renders.
    pub async fn on_fetch_parties(&mut self) -> Result<usize, ActionError> {
        let parties = match self.fetch_remote().await {
            Ok(parties) => parties,
            Err(err) => return Err(self.report("fetch parties", err.into())),
        };

        let count = parties.len();
        self.store.load(parties);
        info!(count, "loaded parties");
        self.render();
        Ok(count)
    }

    pub async fn on_add_party(&mut self, form: &PartyForm) -> Result<AddOutcome, ActionError> {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(err) => return Err(self.report("add party", err.into())),
        };

        let body = match self
            .transport
            .request(
                &self.options.events_path,
                Method::POST,
                Some(payload.to_json(self.options.date_encoding)),
            )
            .await
        {
            Ok(body) => body,
            Err(err) => return Err(self.report("add party", err.into())),
        };

        match extract_created_party(&body, self.options.envelope) {
            Some(party) => {
                let id = party.id.clone();
                info!(party_id = %id, name = %party.name, "created party");
                self.store.append(party);
                self.render();
                Ok(AddOutcome::Appended(id))
            }
            None => {
                debug!("create response did not echo the record; refetching");
                self.on_fetch_parties().await?;
                Ok(AddOutcome::Resynced)
            }
        }
    }

    pub async fn on_delete_party(&mut self, id: &PartyId) -> Result<DeleteOutcome, ActionError> {
        let path = match self.item_path(id) {
            Ok(path) => path,
            Err(err) => return Err(self.report("delete party", err)),
        };
        match self.transport.request(&path, Method::DELETE, None).await {
            Ok(_) => {
                self.store.remove(id);
                info!(party_id = %id, "deleted party");
                self.render();
                Ok(DeleteOutcome::Removed)
            }
            Err(ApiError::Http { status: 404 }) => {
                warn!(party_id = %id, "party already absent on server; delete ignored");
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(err) => Err(self.report("delete party", err.into())),
        }
    }

    pub async fn dispatch(&mut self, action: UiAction) -> Result<DeleteOutcome, ActionError> {
        match action {
            UiAction::Delete(id) => self.on_delete_party(&id).await,
        }
    }

    /// `{events_path}/{id}` with the id kept to a single path segment.
    fn item_path(&self, id: &PartyId) -> Result<String, ActionError> {
        let raw = id.to_string();
        if raw.is_empty() || raw == "." || raw == ".." {
            return Err(ActionError::InvalidId(id.clone()));
        }
        let segment = form_urlencoded::byte_serialize(raw.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        Ok(format!(
            "{}/{segment}",
            self.options.events_path.trim_end_matches('/')
        ))
    }

    async fn fetch_remote(&self) -> Result<Vec<Party>, ApiError> {
        let body = self
            .transport
            .request(&self.options.events_path, Method::GET, None)
            .await?;
        Ok(extract_party_list(body, self.options.envelope)?)
    }

    fn render(&mut self) {
        let nodes = self.store.render();
        self.view.replace(nodes.clone());
        let _ = self.events.send(PartyEvent::ListRendered(nodes));
    }

    fn report(&self, action: &'static str, err: ActionError) -> ActionError {
        error!(action, error = %err, "party action failed");
        let _ = self
            .events
            .send(PartyEvent::Error(format!("{action} failed: {err}")));
        err
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
