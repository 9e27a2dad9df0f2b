//! passbook-extract: bank-statement extraction engine (PDF text + layout
//! heuristics to normalized transactions).

pub mod document;
pub mod lines;
pub mod locate;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod reconcile;
pub mod table;
pub mod types;

pub use document::{content_hash, ExtractError, RawDocument};
pub use normalize::{NormalizeError, ParsedAmount};
pub use pipeline::{extract_from_bytes, extract_from_path, extract_statement, ExtractConfig};
pub use profile::BankProfile;
pub use table::{ColumnKind, Table};
pub use types::Candidate;
