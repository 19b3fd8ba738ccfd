// Module declarations
pub(crate) mod prospects_errors;
pub(crate) mod prospects_model;
pub(crate) mod prospects_repository;
pub(crate) mod prospects_service;

// Re-export the public interface
pub use prospects_model::{NewProspect, Prospect, ProspectDB};
pub use prospects_repository::ProspectRepository;
pub use prospects_service::ProspectService;

// Re-export error types for convenience
pub use prospects_errors::{ProspectError, Result};
