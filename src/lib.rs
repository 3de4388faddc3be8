// Vehicle Lifecycle Ledger - Core Library
// Car lifecycle contract, ledger backends and the hosts that drive them

pub mod car;
pub mod command;
pub mod config;
pub mod contract;
pub mod db;
pub mod error;
pub mod history;
pub mod host;
pub mod import;
pub mod ledger;
pub mod logging;
pub mod stub;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use car::{Car, CarStatus, DEFAULT_OWNER};
pub use command::{parse_registration_expiry, Command};
pub use config::{load_config, LifecycleConfig, ServerConfig, VlmConfig};
pub use contract::CarContract;
pub use db::{Event, SqliteLedger};
pub use error::{ContractError, ContractResult, Response};
pub use history::{CarHistory, CarVersion};
pub use host::ChaincodeHost;
pub use import::{import_cars, load_chassis_numbers, ImportSummary};
pub use ledger::{KeyModification, LedgerStore, MemoryLedger, WriteSet};
pub use stub::Stub;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
