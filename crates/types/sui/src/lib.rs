//! Sui ledger types used by the proof submitter.
//!
//! Only the subset of the Sui data model needed to build, sign and submit a single programmable
//! Move call is represented here. All types serialize to the canonical BCS layout expected by a
//! Sui full node.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![warn(missing_docs)]

mod base_types;
mod crypto;
mod transaction;

pub use base_types::*;
pub use crypto::*;
pub use transaction::*;
