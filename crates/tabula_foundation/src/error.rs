//! Error types for Tabula.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;
use crate::hash::TypeHash;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Tabula operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid (null) entity error.
    #[must_use]
    pub fn invalid_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::InvalidEntity(id))
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a stale entity reference error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates a component not found error.
    #[must_use]
    pub fn component_not_found(entity: EntityId, component: impl Into<String>) -> Self {
        Self::new(ErrorKind::ComponentNotFound {
            entity,
            component: component.into(),
        })
    }

    /// Creates an ownership mismatch error.
    #[must_use]
    pub fn ownership_mismatch(expected: TypeHash, actual: TypeHash) -> Self {
        Self::new(ErrorKind::OwnershipMismatch { expected, actual })
    }

    /// Creates a schema derivation error.
    #[must_use]
    pub fn schema_derivation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaDerivation(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The null entity was passed where a real entity is required.
    #[error("invalid entity: {0:?}")]
    InvalidEntity(EntityId),

    /// Entity was not found.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity reference is stale (generation mismatch).
    #[error("stale entity reference: {0:?}")]
    StaleEntity(EntityId),

    /// Component not found on entity.
    #[error("component not found: {component} on entity {entity:?}")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: EntityId,
        /// The component type that was not found.
        component: String,
    },

    /// A record from one layout was offered to a table of another layout.
    #[error("ownership mismatch: expected type {expected}, got {actual}")]
    OwnershipMismatch {
        /// The layout of the receiving table.
        expected: TypeHash,
        /// The layout the record was created for.
        actual: TypeHash,
    },

    /// A detached record is still bound to a live entity.
    #[error("component for {0:?} is still bound to a live entity")]
    HandleInUse(EntityId),

    /// Two managers for the same record type were registered.
    #[error("manager already registered: {0}")]
    DuplicateManager(String),

    /// A resource could not be turned into a property schema.
    #[error("schema derivation failed: {0}")]
    SchemaDerivation(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Label of the table that raised the error.
    pub table: Option<String>,
    /// Operation being performed.
    pub operation: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table label.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Sets the operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operation, &self.table) {
            (Some(op), Some(table)) => write!(f, "in {op} on {table}"),
            (Some(op), None) => write!(f, "in {op}"),
            (None, Some(table)) => write!(f, "on {table}"),
            (None, None) => Ok(()),
        }
    }
}
