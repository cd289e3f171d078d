//! ZKV Utilities.
//!
//! Miscellaneous utilities shared by the proof submitter crates.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![warn(missing_docs)]

mod hex;
mod logger;

pub use hex::*;
pub use logger::*;
