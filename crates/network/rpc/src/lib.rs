//! ZKV RPC.
//!
//! A minimal Sui JSON-RPC client: gas lookup, dry runs and signed execution over an injected
//! transport.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::similar_names)]
#![warn(missing_docs)]

mod client;
mod error;
mod fetch;
mod response;
mod retry;
mod transport;

pub use client::*;
pub use error::*;
pub use fetch::*;
pub use response::*;
pub use retry::*;
pub use transport::*;
