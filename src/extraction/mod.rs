//! Extraction of receipt records from vision model output.
//!
//! Model text is first reduced to a JSON object by
//! [`parse_model_response`], then converted into a
//! [`ReceiptRecord`](crate::models::ReceiptRecord) by [`RecordBuilder`].

pub mod coerce;
mod record_builder;
mod response_parser;

pub use record_builder::{BuiltRecord, RecordBuilder};
pub use response_parser::parse_model_response;
