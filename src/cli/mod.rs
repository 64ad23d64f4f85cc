//! CLI module for Quill
//!
//! This module provides a small command-line front end to the checker's type machinery.
//!
//! ## Commands
//!
//! - `match <INPUT> <PARAM>` - Report whether an argument type fits a parameter type
//! - `resolve <FUNCTION>` - Show the built-in overload selected for a list of argument types
//! - `signatures <FUNCTION>` - List every known overload of a built-in
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::config::MatchPolicy;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The command ran, but the answer was negative (no match, no such function).
    pub const NEGATIVE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Callable-level type checker
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version = VERSION)]
#[command(about = "Callable-level type checker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report whether an argument type fits a parameter type
    Match {
        /// Type of the argument, e.g. `int|null`
        #[arg(value_name = "INPUT")]
        input: String,
        /// Declared parameter type, e.g. `?float`
        #[arg(value_name = "PARAM")]
        param: String,
        /// Declare a class relationship (repeatable)
        #[arg(long = "extends", value_name = "CHILD:PARENT")]
        extends: Vec<String>,
        /// Do not let `mixed` arguments match everything
        #[arg(long)]
        strict_mixed: bool,
        /// Do not accept a parent class where a child class is expected
        #[arg(long)]
        no_coercion: bool,
    },

    /// Show the overload selected for a built-in call
    Resolve {
        /// Built-in function name
        #[arg(value_name = "FUNCTION")]
        function: String,
        /// Argument type, in call order (repeatable). `_` stands for an unknown type.
        #[arg(long = "arg", value_name = "TYPE")]
        args: Vec<String>,
        /// Signature database to use instead of the embedded one
        #[arg(long, value_name = "FILE")]
        callmap: Option<PathBuf>,
    },

    /// List every known overload of a built-in
    Signatures {
        /// Built-in function name
        #[arg(value_name = "FUNCTION")]
        function: String,
        /// Signature database to use instead of the embedded one
        #[arg(long, value_name = "FILE")]
        callmap: Option<PathBuf>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Match {
            input,
            param,
            extends,
            strict_mixed,
            no_coercion,
        } => {
            let policy = MatchPolicy {
                mixed_input_matches: !strict_mixed,
                allow_coercion: !no_coercion,
            };
            commands::match_types(&input, &param, &extends, policy)
        }
        Command::Resolve {
            function,
            args,
            callmap,
        } => commands::resolve_overload(&function, &args, callmap.as_deref()),
        Command::Signatures { function, callmap } => commands::list_signatures(&function, callmap.as_deref()),
    }
}

// ============================================================================
// Tests
// ============================================================================
