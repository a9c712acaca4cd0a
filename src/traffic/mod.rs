//! Captured traffic module
//!
//! # Overview
//!
//! The traffic module provides:
//! - `ApiTransaction` - A stored request/response pair as written by the capture layer
//! - `decode_body` - base64 body decoding with placeholder restoration
//! - `TransactionStore` - Reads session files from a data directory

mod decode;
mod store;
mod types;

pub use decode::{content_type, decode_body, is_auth_header, is_common_header, restore_placeholders};
pub use store::{parse_transactions, TransactionStore};
pub use types::{ApiTransaction, RequestData, ResponseData};
