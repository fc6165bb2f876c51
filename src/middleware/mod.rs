pub mod context;
pub mod transaction_id;

pub use context::RequestContext;
pub use transaction_id::TransactionId;
