// RealEstate Pro - Core Library
// Exposes all modules for use in the TUI, the API server, and tests

pub mod db;         // Document store over SQLite
pub mod types;      // Resource shapes (Client + forward-declared Lot/Contract/Payment)
pub mod validation; // Form-level and schema-level validators

#[cfg(feature = "client")]
pub mod api_client; // Data-access layer over the gateway, with cached reads

#[cfg(feature = "server")]
pub mod api;        // Persistence gateway (REST over the clients collection)

#[cfg(feature = "tui")]
pub mod ui;         // Terminal client manager

// Re-export commonly used types
pub use db::{
    count_clients, delete_client, get_all_clients, get_client, insert_client, open_database,
    setup_database, update_client, ClientDocument, StoreError,
};
pub use types::{
    Client, ClientInput, ClientPatch, Contract, ContractStatus, Lot, LotDimensions, LotStatus,
    Payment, PaymentStatus,
};
pub use validation::{
    is_valid_email, validate_form, SchemaValidator, ValidationError, ValidationResult,
};

#[cfg(feature = "client")]
pub use api_client::ClientsApi;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
