pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod navigation;
pub mod session;
pub mod sinks;
pub mod websocket;

pub use api::NotificationApi;
pub use auth::{CredentialProvider, StaticCredentials};
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use models::{Notification, NotificationKind};
pub use navigation::NavigationTarget;
pub use session::{ConnectionState, NotificationSession};
pub use sinks::{DisplaySink, NavigationSink, Toast, ToastStyle};
pub use websocket::{WsClientMessage, WsServerMessage};
