//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables of the ledger service.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod category_budget;
pub mod envelope;
pub mod transaction;
pub mod user;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use category_budget::{
    Column as CategoryBudgetColumn, Entity as CategoryBudget, Model as CategoryBudgetModel,
};
pub use envelope::{Column as EnvelopeColumn, Entity as Envelope, Model as EnvelopeModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel, TxKind,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
