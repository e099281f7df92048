/// Per-category monthly spending limits
pub mod budget;
/// Category registry with auto-registration and default seeds
pub mod category;
/// Savings envelopes and their transfers
pub mod envelope;
/// Append-only income/expense ledger
pub mod ledger;
/// `YYYY-MM` calendar month helper
pub mod month;
/// Read-only balance and budget views
pub mod stats;
/// User accounts and credential checks
pub mod user;
