//! # parsedcmd Architecture
//!
//! parsedcmd is the **argument layer** of a line-oriented interactive shell. The shell
//! reads a line, and parsedcmd turns it into a typed call of the right command handler.
//! Line editing, history and the loop's terminal handling belong to whoever embeds it.
//!
//! ## The Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registration (function.rs, shell.rs: ShellBuilder)         │
//! │  - Functions: parameters, wrapping links, raw mode, bodies  │
//! │  - Commands: name → function                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  build()
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Resolution (resolve.rs → params.rs)                        │
//! │  - Follow wrapping links to the canonical function          │
//! │  - Build and cache its parameter descriptors                │
//! │  - All declaration errors surface here, once                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatch, per line (shell.rs: Shell)                       │
//! │  - Pick the command by its first word                       │
//! │  - Tokenize (tokenize.rs) and bind (bind.rs)                │
//! │  - Call the handler; report failures as `*** ` diagnostics  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Binding Rules in Brief
//!
//! - Options (`-name value`) are only recognised at the **start** of the arguments, and
//!   only for keyword-only parameters.
//! - Remaining tokens fill positional parameters in order, extras go to the variadic
//!   parameter.
//! - Tokens go through the parameter's [`coerce::Coercion`]; defaults never do.
//!
//! See [`bind`] for the full rules.
//!
//! ## Example
//!
//! ```
//! use parsedcmd::coerce::Coercion;
//! use parsedcmd::config::ShellConfig;
//! use parsedcmd::function::{Function, Parameter};
//! use parsedcmd::shell::ShellBuilder;
//! use std::io::Write;
//!
//! let print = Function::new("do_print")
//!     .param(Parameter::positional("line").default("abc"))
//!     .param(Parameter::keyword_only("repeat").default(1).annotated(Coercion::integer()))
//!     .body(|ctx, args| {
//!         for _ in 0..args.int("repeat").unwrap_or(1) {
//!             writeln!(ctx, "{}", args.str("line").unwrap_or_default())?;
//!         }
//!         Ok(())
//!     });
//!
//! let mut shell = ShellBuilder::new(ShellConfig::default())
//!     .command("print", print)
//!     .build(Vec::new())
//!     .unwrap();
//!
//! shell.onecmd("print -repeat 2 hello").unwrap();
//! assert_eq!(shell.output().as_slice(), b"hello\nhello\n");
//! ```
//!
//! ## Module Overview
//!
//! - [`shell`]: Builder, registry, dispatcher and command loop
//! - [`function`]: Function declarations and wrapping links
//! - [`resolve`]: Canonical function lookup
//! - [`params`]: Parameter descriptors and their cache
//! - [`bind`]: Argument binding and the handler's view of it
//! - [`tokenize`]: Pluggable tokenizers
//! - [`coerce`]: Coercion functions
//! - [`usage`]: Usage text
//! - [`render`]: Diagnostic text
//! - [`config`]: Configuration
//! - [`error`]: Error types

pub mod bind;
pub mod coerce;
pub mod config;
pub mod error;
pub mod function;
pub mod params;
pub mod render;
pub mod resolve;
pub mod shell;
pub mod tokenize;
pub mod usage;
pub mod value;
