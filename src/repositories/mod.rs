pub mod account_repository;
pub mod operation_type_repository;
pub mod transaction_repository;

pub use account_repository::{AccountRepository, PgAccountRepository};
pub use operation_type_repository::{OperationTypeRepository, PgOperationTypeRepository};
pub use transaction_repository::{PgTransactionRepository, TransactionRepository};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use operation_type_repository::MockOperationTypeRepository;
#[cfg(test)]
pub use transaction_repository::MockTransactionRepository;
