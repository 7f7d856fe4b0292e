//! Subprocess interception for template rendering.
//!
//! Templates rendered in the studio may invoke external commands. This crate
//! provides the gateway those invocations go through: a [`SubprocessManager`]
//! trait with two implementations, and a [`CommandHistory`] that records every
//! invocation in order.
//!
//! - [`SubprocessManagerMock`]: records-only variant that never executes
//!   anything. This is the safe default for interactive editing.
//! - [`ShellSubprocessManager`]: executes commands through the platform shell
//!   and returns their stdout.
//!
//! # Example
//!
//! ```rust
//! use eventum_subprocess::{SubprocessManager, SubprocessManagerMock};
//!
//! let manager = SubprocessManagerMock;
//! let output = manager.run("rm -rf /").unwrap();
//! assert_eq!(output, ""); // nothing was executed
//! ```

mod error;
mod history;
mod manager;

pub use error::SubprocessError;
pub use history::CommandHistory;
pub use manager::{ShellSubprocessManager, SubprocessManager, SubprocessManagerMock};
