use crate::money::Money;
use thiserror::Error;

/// Every failure the ledger service can report.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid transaction: {reason}")]
    InvalidTransaction { reason: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Money },

    #[error("Amount overflow: {context}")]
    AmountOverflow { context: String },

    #[error("Insufficient funds: available {current}, required {required}")]
    InsufficientFunds { current: Money, required: Money },

    #[error("Envelope not found: {name}")]
    EnvelopeNotFound { name: String },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: i64 },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password hashing error: {message}")]
    PasswordHash { message: String },
}

impl Error {
    /// Machine-readable error kind reported to API clients.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTransaction { .. } => "invalid_transaction",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::EnvelopeNotFound { .. }
            | Self::CategoryNotFound { .. }
            | Self::TransactionNotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Unauthorized | Self::InvalidCredentials => "unauthorized",
            Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::PasswordHash { .. }
            | Self::AmountOverflow { .. } => "internal",
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
