#![deny(missing_docs)]
#![doc = "Core error types and report descriptors shared by the fiber-network post-processing crates."]

pub mod command;
pub mod errors;

pub use command::ReportCommand;
pub use errors::{ErrorInfo, FnetError};
