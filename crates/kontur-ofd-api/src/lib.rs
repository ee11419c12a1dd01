// kontur-ofd-api: Async Rust client for the Kontur OFD fiscal receipt API

pub mod auth;
pub mod cashboxes;
pub mod client;
pub mod error;
pub mod models;
pub mod organizations;
pub mod receipts;
pub mod transport;

pub use auth::{Credentials, Endpoints, LOGIN_PREFIX, Session};
pub use client::OfdClient;
pub use error::Error;
pub use models::{Cashbox, FiscalDrive, Organization, Receipt, ReceiptItem};
pub use receipts::get_receipts;
pub use transport::{TlsMode, TransportConfig};
