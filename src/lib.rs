#![deny(missing_docs)]

//! <fullname>Lambda echo</fullname>
//!
//! Introspection service deployed next to a Lambda function under test.
//! End-to-end tests call it over HTTP to check the live state of the
//! function: its configuration, execution role, attached policies,
//! tags and most recent log lines.
//!
//! Every answer is looked up on demand, following the chain
//! function → role → policies, nothing is cached between requests.

/// `cloudwatch_logs` tails the function's log group
pub mod cloudwatch_logs;

/// `config` loads the process wide configuration
pub mod config;

mod error;
pub use error::RuntimeError;

/// `function` resolves the deployed function configuration
pub mod function;

mod handler;
pub use handler::{handle_request, AppContext};

/// `policy` resolves the policies attached to the execution role
pub mod policy;

/// `role` resolves the function's execution role
pub mod role;

/// `sts` includes helpers to work with AWS STS
pub mod sts;

/// `tag` converts tag lists into maps
pub mod tag;

#[cfg(test)]
mod test_util;
