pub mod account;
pub mod operation_type;
pub mod transaction;

pub use account::{is_valid_document_number, Account, DOCUMENT_NUMBER_LEN};
pub use operation_type::{AmountSign, OperationCategory, OperationType};
pub use transaction::{
    is_valid_amount, max_amount, round_amount, NewTransaction, Transaction, TransactionDetails,
    TransactionDetailsRow, AMOUNT_SCALE,
};
