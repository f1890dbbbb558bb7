//! Domain Layer - Core Entity Trait
//!
//! Defines the basic contract for ledger entities and the shared error type.

use thiserror::Error;

/// Core trait for domain entities keyed by a natural key
pub trait Entity: Clone {
    /// The type of the entity's unique key
    type Key: Clone + Eq + std::hash::Hash;

    /// Returns the entity's key
    fn key(&self) -> Self::Key;
}

/// Entity whose key is its name, comparable without an allocation
pub trait NamedEntity: Entity<Key = String> {
    fn name(&self) -> &str;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}
