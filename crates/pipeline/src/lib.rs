//! ZKV Pipeline.
//!
//! Turns a proof artifact into a Move call against the verifier contract, validates it with a dry
//! run and, for the verification variant, signs and submits it.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![warn(missing_docs)]

mod builder;
mod error;
mod keys;
mod pipeline;
mod settings;
mod variant;

pub use builder::*;
pub use error::*;
pub use keys::*;
pub use pipeline::*;
pub use settings::*;
pub use variant::*;
