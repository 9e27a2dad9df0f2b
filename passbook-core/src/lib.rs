//! passbook-core: bank-agnostic statement types and the keyword categorizer

pub mod category;
pub mod metadata;
pub mod transaction;

pub use category::{CategoryRule, CategoryRules};
pub use metadata::{BalanceCheck, ExtractionResult, StatementMetadata, StatementPeriod};
pub use transaction::{Direction, Transaction, MAX_DESCRIPTION_LEN};
