pub mod config;
pub mod controller;
pub mod error;
pub mod store;
pub mod transport;
pub mod view;

pub use config::{ClientConfig, ConfigProvider, FileConfig, RemoteConfig, StaticConfig};
pub use controller::{AddOutcome, ControllerOptions, DeleteOutcome, PartyController, PartyEvent};
pub use error::{ActionError, ApiError};
pub use store::PartyStore;
pub use transport::{ApiClient, JsonTransport, DEFAULT_REQUEST_TIMEOUT};
pub use view::{DisplayNode, ListView, UiAction};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
