// Module declarations
pub(crate) mod clients_errors;
pub(crate) mod clients_model;
pub(crate) mod clients_repository;
pub(crate) mod clients_service;

// Re-export the public interface
pub use clients_model::{Client, ClientDB, ClientUpdate, NewClient};
pub use clients_repository::ClientRepository;
pub use clients_service::ClientService;

// Re-export error types for convenience
pub use clients_errors::{ClientError, Result};
