//! # Shell
//!
//! The dispatcher: owns the command registry and turns each input line into a call.
//!
//! ## Building
//!
//! Commands are registered on a [`ShellBuilder`]. [`ShellBuilder::build`] declares every
//! function, resolves every command to its canonical function, and builds the
//! parameter model of each one. Any declaration problem (a wrapping cycle, a dangling
//! link, a malformed parameter list) fails the build, so a shell that exists can always
//! parse its commands' lines.
//!
//! ## Dispatching
//!
//! [`Shell::onecmd`] handles one line:
//!
//! - an empty line repeats the previous one (see [`ShellConfig::repeat_last_command`]);
//! - `?topic` means `help topic`, `!text` means `shell text` when a `shell` command exists;
//! - the first whitespace-delimited word picks the command; raw-mode commands get the
//!   rest of the line as is, every other command gets it tokenized and bound.
//!
//! Binding failures are printed as `*** ` diagnostics and returned as
//! [`Dispatch::Rejected`]; they never escape as errors. Handler failures are printed the
//! same way. Only output errors are returned as `Err`.

use crate::bind::{bind, Args, BoundCall};
use crate::config::ShellConfig;
use crate::error::{BindingError, ResolutionError, ShellError};
use crate::function::{Function, Handler};
use crate::params::{DescriptorCache, Parameters};
use crate::render;
use crate::resolve::{resolve, FunctionTable};
use crate::tokenize::{ShellWords, Tokenizer};
use crate::usage;
use crate::value::Value;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use tracing::{debug, warn};

const HELP: &str = "help";
const SHELL: &str = "shell";
const HELP_DOC: &str = "List available commands with \"help\" or detailed help with \"help cmd\".";

/// Handed to a handler for the duration of one call.
///
/// Writing to the context writes to the shell's output.
pub struct Ctx<'a> {
    out: &'a mut dyn Write,
    stop: bool,
}

impl<'a> Ctx<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out, stop: false }
    }

    /// Ask the command loop to exit after this command.
    pub fn stop(&mut self) {
        self.stop = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop
    }
}

impl Write for Ctx<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Outcome of one line.
#[derive(Debug)]
pub enum Dispatch {
    Empty,
    Completed,
    /// The handler asked the loop to stop.
    Stopped,
    Rejected(BindingError),
    HandlerFailed(anyhow::Error),
}

impl Dispatch {
    pub fn is_stop(&self) -> bool {
        matches!(self, Dispatch::Stopped)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Dispatch::Completed | Dispatch::Stopped | Dispatch::Empty)
    }
}

/// A registered command: its handler plus the cached parameter model of its
/// canonical function.
#[derive(Clone)]
pub struct Command {
    pub function: String,
    pub canonical: String,
    pub handler: Handler,
    pub params: Rc<Parameters>,
    pub doc: String,
}

/// Command name to command. Read-only once built.
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<String, Command>,
}

impl Registry {
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

pub struct ShellBuilder {
    config: ShellConfig,
    functions: Vec<Function>,
    commands: Vec<(String, String)>,
    tokenizer: Box<dyn Tokenizer>,
}

impl ShellBuilder {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            functions: Vec::new(),
            commands: Vec::new(),
            tokenizer: Box::new(ShellWords),
        }
    }

    /// Declare a function without exposing it as a command, typically the inner
    /// function of a wrapper.
    pub fn declare(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    /// Declare `function` and register it as the command `name`.
    pub fn command(mut self, name: impl Into<String>, function: Function) -> Self {
        self.commands.push((name.into(), function.name().to_string()));
        self.functions.push(function);
        self
    }

    /// Register `name` for a function declared elsewhere on this builder.
    pub fn alias(mut self, name: impl Into<String>, function: impl Into<String>) -> Self {
        self.commands.push((name.into(), function.into()));
        self
    }

    pub fn tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn build<W: Write>(self, out: W) -> Result<Shell<W>, ResolutionError> {
        if !self.config.marker_is_valid() {
            return Err(ResolutionError::InvalidMarker(self.config.option_marker));
        }

        let mut table = FunctionTable::new();
        for function in self.functions {
            function.validate()?;
            table.insert(function)?;
        }

        let mut cache = DescriptorCache::new();
        let mut registry = Registry::default();

        for (name, function_name) in self.commands {
            if !valid_command_name(&name) {
                return Err(ResolutionError::InvalidCommandName(name));
            }
            if registry.contains(&name) {
                return Err(ResolutionError::DuplicateCommand(name));
            }

            let outer = table
                .get(&function_name)
                .ok_or_else(|| ResolutionError::UnknownFunction {
                    wrapper: name.clone(),
                    inner: function_name.clone(),
                })?;
            let handler = outer.get_handler().ok_or_else(|| ResolutionError::MissingBody {
                command: name.clone(),
                function: function_name.clone(),
            })?;

            let canonical = resolve(&table, &function_name)?;
            let raw = outer.is_raw() || canonical.is_raw();
            let params = cache.get_or_build(canonical, raw)?;
            let doc = outer
                .doc
                .as_deref()
                .unwrap_or_else(|| canonical.doc_text())
                .to_string();

            debug!(
                command = %name,
                function = %function_name,
                canonical = %canonical.name(),
                raw,
                "registered command"
            );

            registry.commands.insert(
                name,
                Command {
                    function: function_name,
                    canonical: canonical.name().to_string(),
                    handler,
                    params,
                    doc,
                },
            );
        }

        debug!(
            commands = registry.len(),
            models = cache.len(),
            "command registry built"
        );

        Ok(Shell {
            registry,
            config: self.config,
            tokenizer: self.tokenizer,
            out,
            last_line: None,
        })
    }
}

fn valid_command_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(char::is_whitespace)
        && !name.starts_with(['?', '!'])
}

pub struct Shell<W: Write> {
    registry: Registry,
    config: ShellConfig,
    tokenizer: Box<dyn Tokenizer>,
    out: W,
    last_line: Option<String>,
}

impl<W: Write> Shell<W> {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Synopsis and documentation of a command.
    pub fn describe(&self, name: &str) -> Option<String> {
        let command = self.registry.get(name)?;
        Some(usage::format(
            name,
            &command.params,
            &command.doc,
            &self.config.option_marker,
        ))
    }

    /// Read lines until end of input or until a command asks to stop.
    pub fn cmdloop<R: BufRead>(&mut self, input: R) -> Result<(), ShellError> {
        if let Some(intro) = &self.config.intro {
            writeln!(self.out, "{}", intro)?;
        }

        let mut lines = input.lines();
        loop {
            if !self.config.prompt.is_empty() {
                write!(self.out, "{}", self.config.prompt)?;
                self.out.flush()?;
            }
            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            if self.onecmd(&line)?.is_stop() {
                break;
            }
        }
        Ok(())
    }

    /// Interpret one line.
    pub fn onecmd(&mut self, line: &str) -> Result<Dispatch, ShellError> {
        let line = line.trim();
        if line.is_empty() {
            return self.emptyline();
        }

        let line = if let Some(rest) = line.strip_prefix('?') {
            format!("{} {}", HELP, rest)
        } else if let Some(rest) = line.strip_prefix('!').filter(|_| self.registry.contains(SHELL)) {
            format!("{} {}", SHELL, rest)
        } else {
            line.to_string()
        };

        self.last_line = Some(line.clone());
        self.dispatch(&line)
    }

    fn emptyline(&mut self) -> Result<Dispatch, ShellError> {
        match (&self.last_line, self.config.repeat_last_command) {
            (Some(last), true) => {
                let last = last.clone();
                self.dispatch(&last)
            }
            _ => Ok(Dispatch::Empty),
        }
    }

    fn dispatch(&mut self, line: &str) -> Result<Dispatch, ShellError> {
        let (name, rest) = split_command(line);

        if name == HELP && !self.registry.contains(HELP) {
            return self.help(rest);
        }

        let Some(command) = self.registry.get(name) else {
            return self.reject(BindingError::UnknownCommand(name.to_string()), line, &[]);
        };
        let handler = Rc::clone(&command.handler);
        let params = Rc::clone(&command.params);

        let call = if params.is_raw() {
            BoundCall {
                positional: vec![Value::Str(rest.to_string())],
                ..BoundCall::default()
            }
        } else {
            let tokens = match self.tokenizer.tokenize(rest) {
                Ok(tokens) => tokens,
                Err(err) => return self.reject(err.into(), line, &[]),
            };
            debug!(command = name, tokens = tokens.len(), "binding");
            match bind(&tokens, &params, &self.config.option_marker) {
                Ok(call) => call,
                Err(err) => return self.reject(err, line, &tokens),
            }
        };

        let args = Args::new(&call, &params);
        let mut ctx = Ctx::new(&mut self.out);
        match handler(&mut ctx, &args) {
            Ok(()) if ctx.stop_requested() => Ok(Dispatch::Stopped),
            Ok(()) => Ok(Dispatch::Completed),
            Err(err) => {
                warn!(command = name, error = %err, "command failed");
                writeln!(self.out, "{}", render::handler_error(&err))?;
                Ok(Dispatch::HandlerFailed(err))
            }
        }
    }

    fn reject(
        &mut self,
        err: BindingError,
        line: &str,
        tokens: &[String],
    ) -> Result<Dispatch, ShellError> {
        debug!(line, error = %err, "line rejected");
        writeln!(self.out, "{}", render::binding_error(&err, line, tokens))?;
        Ok(Dispatch::Rejected(err))
    }

    fn help(&mut self, topic: &str) -> Result<Dispatch, ShellError> {
        let topic = topic.split_whitespace().next().unwrap_or("");

        if topic.is_empty() {
            let (mut documented, undocumented): (Vec<&str>, Vec<&str>) = self
                .registry
                .names()
                .partition(|name| {
                    self.registry
                        .get(name)
                        .is_some_and(|command| !command.doc.trim().is_empty())
                });
            documented.push(HELP);
            documented.sort_unstable();
            writeln!(self.out, "Documented commands (type help <topic>):")?;
            writeln!(self.out, "{}", documented.join("  "))?;
            if !undocumented.is_empty() {
                writeln!(self.out, "Undocumented commands:")?;
                writeln!(self.out, "{}", undocumented.join("  "))?;
            }
            return Ok(Dispatch::Completed);
        }

        let text = match self.registry.get(topic) {
            Some(_) if self.config.show_usage => self.describe(topic),
            Some(command) if !command.doc.trim().is_empty() => {
                Some(command.doc.trim_end().to_string())
            }
            Some(_) => None,
            None if topic == HELP => Some(HELP_DOC.to_string()),
            None => None,
        };

        match text {
            Some(text) => writeln!(self.out, "{}", text)?,
            None => writeln!(self.out, "*** No help on {}", topic)?,
        }
        Ok(Dispatch::Completed)
    }
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (line, ""),
    }
}
