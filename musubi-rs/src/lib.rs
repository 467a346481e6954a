//! # musubi: descriptor-driven command dispatch
//!
//! Maps a flat list of command-line tokens onto a registered handler
//! by walking the handler's declared parameter descriptors: positional
//! slots fill in declaration order, `--name` options bind by alias,
//! defaults and requiredness apply afterwards, and service parameters
//! resolve from an [`Injector`] rather than from tokens.
//!
//! ## Core Principles
//!
//! - **Explicit descriptors**: every parameter states its role
//!   (positional, named option, injected) at registration time; no
//!   runtime introspection
//! - **Deterministic binding**: one left-to-right pass over the
//!   tokens, no backtracking, declaration order everywhere
//! - **Deferred conversion failure**: a malformed value behaves like
//!   an omitted one and surfaces through the missing-required path
//! - **Type-driven DI**: handlers receive container-resolved services
//!   next to their CLI-bound arguments
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use musubi::{CommandRegistry, CommandSpec, Dispatcher, TypeTag};
//!
//! #[tokio::main]
//! async fn main() {
//!     musubi::init_subscriber();
//!
//!     let mut registry = CommandRegistry::new();
//!     registry.register(
//!         CommandSpec::new("greet")
//!             .about("Greet someone by name")
//!             .positional("name", TypeTag::Str)
//!             .flag("shout").help("Print in uppercase")
//!             .handler(|ctx| async move {
//!                 let mut line = format!("Hello, {}!", ctx.string(0)?);
//!                 if ctx.boolean(1)? {
//!                     line = line.to_uppercase();
//!                 }
//!                 println!("{line}");
//!                 Ok(())
//!             }),
//!     );
//!
//!     let dispatcher = Dispatcher::new(registry);
//!     std::process::exit(dispatcher.run().await);
//! }
//! ```
//!
//! Handlers receive a [`DispatchContext`] holding the fully assembled
//! argument vector (one slot per declared parameter) plus the
//! injector, and return [`CliResult`]`<()>`; the dispatcher awaits the
//! returned future and reports the exit status. Calling the binary
//! with no command prints the listing; an unknown command prints a
//! diagnostic and the listing with exit code 1.

use std::io::IsTerminal;

use thiserror::Error;

mod bind;
mod command;
mod dispatch;
mod inject;
mod param;
mod parse;
mod registry;
mod value;

pub mod build_info;
pub mod help;
pub mod tracing_support;

pub use command::{Arity, Command, CommandFuture, DispatchContext};
pub use dispatch::Dispatcher;
pub use inject::Injector;
pub use param::{ParamKind, ParamSpec, TypeTag};
pub use registry::{CommandDescriptor, CommandRegistry, CommandSet, CommandSpec};
pub use value::{parse_bool_literal, try_convert, ServiceHandle, Value};

pub use tracing_support::init_subscriber;

#[cfg(feature = "subscriber")]
pub use tracing_support::{init_subscriber_with_config, TracingConfig, TracingFormat};

#[cfg(feature = "build-info")]
pub use build_info::{version_info, version_short};

// ============================================================================
// Error Types
// ============================================================================

/// Result type returned by handlers and the binding pipeline.
pub type CliResult<T> = Result<T, CliError>;

/// Top-level error for dispatch operations.
///
/// Distinguishes user-fixable errors (exit code 1) from system
/// failures (exit code 101).
#[derive(Debug, Error)]
pub enum CliError {
    /// User-input errors: reported, dispatch aborts, exit code 1.
    #[error(transparent)]
    User(#[from] UserError),

    /// Programming or environment failures, exit code 101.
    #[error(transparent)]
    System(#[from] SystemError),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::User(_) => 1,
            CliError::System(_) => 101,
        }
    }

    /// Convenience constructor for user errors.
    pub fn user(message: impl Into<String>) -> Self {
        CliError::User(UserError::Generic(message.into()))
    }

    /// Convenience constructor for system errors.
    pub fn system(message: impl Into<String>) -> Self {
        CliError::System(SystemError::Internal(message.into()))
    }
}

/// User-input errors. Each one aborts the dispatch before the handler
/// runs (or reports the handler's own complaint); none are retried.
#[derive(Debug, Error)]
pub enum UserError {
    /// The first token matched no registered command.
    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    /// A positional parameter ended up unset with no default.
    #[error("Missing required argument '{0}'")]
    MissingArgument(String),

    /// A named option ended up unset with no default; carries the
    /// resolved `--` alias.
    #[error("Missing required option '{0}'")]
    MissingOption(String),

    /// Generic user error raised by a handler.
    #[error("Error: {0}")]
    Generic(String),
}

/// System-level failures (exit code 101).
#[derive(Debug, Error)]
pub enum SystemError {
    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::System(SystemError::Io(e))
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Outcome of one dispatch: exit code plus whatever should be shown.
pub struct Response {
    /// Exit code (0 = success, 1 = user error, 101 = system error).
    pub exit_code: i32,

    /// Output to display.
    pub output: Output,
}

impl Response {
    /// Successful response with text output.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            output: Output::Text(content.into()),
        }
    }

    /// Successful response with JSON output.
    pub fn json(content: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            output: Output::Json(content.into()),
        }
    }

    /// Successful silent response.
    pub fn silent() -> Self {
        Self {
            exit_code: 0,
            output: Output::Silent,
        }
    }

    /// Error response.
    pub fn error(exit_code: i32, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: Output::Text(message.into()),
        }
    }

    /// Print to the right stream: stdout on success, stderr on
    /// failure. Error text is styled when stderr is a terminal.
    pub fn emit(&self) {
        if self.output.is_empty() {
            return;
        }
        if self.exit_code == 0 {
            println!("{}", self.output);
        } else if std::io::stderr().is_terminal() {
            let style = anstyle::Style::new()
                .fg_color(Some(anstyle::AnsiColor::Red.into()))
                .bold();
            eprintln!("{style}{}{style:#}", self.output);
        } else {
            eprintln!("{}", self.output);
        }
    }
}

/// Output form of a response.
#[derive(Debug)]
pub enum Output {
    /// No output.
    Silent,

    /// Text output.
    Text(String),

    /// JSON output (for machine-readable listings).
    Json(String),
}

impl Output {
    /// Check if output is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Output::Silent)
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Silent => Ok(()),
            Output::Text(s) | Output::Json(s) => write!(f, "{s}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_exit_code() {
        let err = CliError::user("bad input");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_system_error_exit_code() {
        let err = CliError::system("bug");
        assert_eq!(err.exit_code(), 101);
    }

    #[test]
    fn test_missing_messages_name_the_culprit() {
        let arg = UserError::MissingArgument("name".into());
        assert_eq!(arg.to_string(), "Missing required argument 'name'");

        let opt = UserError::MissingOption("--container-name".into());
        assert_eq!(opt.to_string(), "Missing required option '--container-name'");
    }

    #[test]
    fn test_io_error_maps_to_system() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: CliError = io.into();
        assert_eq!(err.exit_code(), 101);
    }

    #[test]
    fn test_silent_response_is_empty() {
        let response = Response::silent();
        assert_eq!(response.exit_code, 0);
        assert!(response.output.is_empty());
    }

    #[test]
    fn test_error_response() {
        let response = Response::error(1, "nope");
        assert_eq!(response.exit_code, 1);
        assert_eq!(response.output.to_string(), "nope");
    }
}
