//! # Function Declarations
//!
//! A [`Function`] is the registration-time description of something a command can be
//! bound to: its native parameter list, the out-of-band declarations layered on top of
//! it, and optionally the body that runs when the command is dispatched.
//!
//! ## Wrapping
//!
//! A function may declare that it [wraps](Function::wraps) another function, by name.
//! Wrappers usually take "anything" and forward to their inner function, so their own
//! parameter list says nothing useful about how to parse a line. Resolution
//! (see [`crate::resolve`]) follows these links down to the function whose parameter
//! list should be used, unless a wrapper opts out with [`Function::use_own_signature`].
//!
//! ## Native vs explicit declarations
//!
//! Parameters may carry a native annotation and a native keyword-only kind. The same
//! information can be retrofitted with [`Function::annotate`] and
//! [`Function::keyword_only`]; explicit annotations override native ones, and the
//! keyword-only set is the union of both.

use crate::bind::Args;
use crate::coerce::Coercion;
use crate::error::ResolutionError;
use crate::shell::Ctx;
use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::rc::Rc;

/// The callable invoked when a command is dispatched.
pub type Handler = Rc<dyn Fn(&mut Ctx<'_>, &Args<'_>) -> anyhow::Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    /// The implicit instance parameter; never bound from the line.
    Receiver,
    Positional,
    /// Catch-all for trailing tokens.
    Variadic,
    KeywordOnly,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub kind: DeclaredKind,
    pub default: Option<Value>,
    pub annotation: Option<Coercion>,
}

impl Parameter {
    fn new(name: impl Into<String>, kind: DeclaredKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            annotation: None,
        }
    }

    pub fn receiver(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredKind::Receiver)
    }

    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredKind::Positional)
    }

    pub fn variadic(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredKind::Variadic)
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::new(name, DeclaredKind::KeywordOnly)
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Native per-parameter coercion.
    pub fn annotated(mut self, coercion: Coercion) -> Self {
        self.annotation = Some(coercion);
        self
    }
}

#[derive(Clone, Default)]
pub struct Function {
    pub(crate) name: String,
    pub(crate) params: Vec<Parameter>,
    pub(crate) doc: Option<String>,
    pub(crate) wraps: Option<String>,
    pub(crate) stop_here: bool,
    pub(crate) raw: bool,
    pub(crate) annotations: BTreeMap<String, Coercion>,
    pub(crate) keyword_only: BTreeSet<String>,
    pub(crate) body: Option<Handler>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Declare that this function stands in for `inner`.
    pub fn wraps(mut self, inner: impl Into<String>) -> Self {
        self.wraps = Some(inner.into());
        self
    }

    /// Stop resolution here even though this function wraps another.
    pub fn use_own_signature(mut self) -> Self {
        self.stop_here = true;
        self
    }

    /// The command receives the untokenized line as its only argument.
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Explicit coercion for `param`, overriding any native annotation.
    pub fn annotate(mut self, param: impl Into<String>, coercion: Coercion) -> Self {
        self.annotations.insert(param.into(), coercion);
        self
    }

    pub fn keyword_only(mut self, param: impl Into<String>) -> Self {
        self.keyword_only.insert(param.into());
        self
    }

    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Ctx<'_>, &Args<'_>) -> anyhow::Result<()> + 'static,
    {
        self.body = Some(Rc::new(body));
        self
    }

    /// Use an existing handler as the body, typically an inner function's.
    pub fn handler(mut self, handler: Handler) -> Self {
        self.body = Some(handler);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn doc_text(&self) -> &str {
        self.doc.as_deref().unwrap_or("")
    }

    pub fn wrapped(&self) -> Option<&str> {
        self.wraps.as_deref()
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn stops_here(&self) -> bool {
        self.stop_here
    }

    pub fn get_handler(&self) -> Option<Handler> {
        self.body.clone()
    }

    /// Check the declarations that do not depend on any other function.
    pub fn validate(&self) -> Result<(), ResolutionError> {
        let mut seen = HashSet::new();
        let mut variadic_seen = false;

        for (i, param) in self.params.iter().enumerate() {
            if !seen.insert(param.name.as_str()) {
                return Err(ResolutionError::DuplicateParameter {
                    function: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }
            match param.kind {
                DeclaredKind::Receiver if i != 0 => {
                    return Err(ResolutionError::MisplacedReceiver {
                        function: self.name.clone(),
                        parameter: param.name.clone(),
                    });
                }
                DeclaredKind::Variadic if variadic_seen => {
                    return Err(self.misplaced_variadic(&param.name));
                }
                DeclaredKind::Variadic => variadic_seen = true,
                DeclaredKind::Positional if variadic_seen => {
                    return Err(self.misplaced_variadic(&param.name));
                }
                _ => {}
            }
        }

        for name in self.annotations.keys() {
            match self.find(name) {
                Some(p) if p.kind != DeclaredKind::Receiver => {}
                _ => {
                    return Err(ResolutionError::UnknownAnnotation {
                        function: self.name.clone(),
                        parameter: name.clone(),
                    })
                }
            }
        }

        for name in &self.keyword_only {
            match self.find(name).map(|p| p.kind) {
                Some(DeclaredKind::Positional) | Some(DeclaredKind::KeywordOnly) => {}
                _ => {
                    return Err(ResolutionError::InvalidKeywordOnly {
                        function: self.name.clone(),
                        parameter: name.clone(),
                    })
                }
            }
        }

        Ok(())
    }

    fn find(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    fn misplaced_variadic(&self, parameter: &str) -> ResolutionError {
        let variadic = self
            .params
            .iter()
            .find(|p| p.kind == DeclaredKind::Variadic)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| parameter.to_string());
        ResolutionError::MisplacedVariadic {
            function: self.name.clone(),
            parameter: variadic,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("wraps", &self.wraps)
            .field("stop_here", &self.stop_here)
            .field("raw", &self.raw)
            .field("annotations", &self.annotations)
            .field("keyword_only", &self.keyword_only)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
