pub mod envelope;
pub mod pii;

pub use envelope::{ApiEnvelope, Pagination};
pub use pii::Masked;
