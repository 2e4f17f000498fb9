pub mod account_service;
pub mod seeding;
pub mod transaction_service;

pub use account_service::AccountService;
pub use seeding::{seed_operation_types, SeedReport};
pub use transaction_service::{CreateTransactionCommand, TransactionService};
