pub mod analyzer;
pub mod assemble;
pub mod decode;
pub mod error;
pub mod explain;
pub mod labels;
pub mod ledger;
pub mod registry;
pub mod risk;
pub mod scenarios;
pub mod source;
pub mod types;
pub mod units;

#[cfg(test)]
mod test_util;

pub use analyzer::{Analysis, Analyzer};
pub use error::{CoreError, SourceError};
pub use registry::SignatureRegistry;
pub use types::{DecodedTransaction, IntentAnalysis, RawTransactionRequest, TransactionContext};
