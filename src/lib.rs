pub mod config;
pub mod error;
pub mod ext;
pub mod format;
pub mod icon_rpc;
pub mod swap;
pub mod tracing;
pub mod types;
pub mod units;
pub mod vote;

pub use config::{AddressBook, Network, Settings};
pub use error::{ClientError, ConfigError, EncodingError, PayloadError, SwapError, TransportError};
pub use swap::{SwapStore, reduce};
