//! Amounts in words for printed invoices, quotes and payslips.

pub mod amount;
pub mod french;
pub mod vocabulary;

pub use amount::to_words;
pub use french::number_to_words;
pub use vocabulary::{MAX_DECIMAL_PLACES, Vocabulary};
