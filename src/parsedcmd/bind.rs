//! # Argument Binding
//!
//! Turns the tokens of one line into a [`BoundCall`] for a parameter list.
//!
//! Binding runs in four passes:
//!
//! 1. **Options**: a leading run of `<marker>name value` pairs assigns keyword-only
//!    parameters. The run ends at the first token that is not a marker followed by a
//!    keyword-only name, or at such a token when nothing follows it. Options are never
//!    recognised after that point, so in `cmd val -flag x` both `-flag` and `x` are
//!    ordinary tokens.
//! 2. **Distribution**: the remaining tokens fill positional parameters left to right,
//!    then the variadic parameter, if any.
//! 3. **Defaulting**: unfilled positional parameters take their default. Keyword-only
//!    parameters that were not given are left out of the call entirely.
//! 4. **Coercion**: every value that came from a token goes through its parameter's
//!    coercion. Defaults are used as declared.
//!
//! Any failure returns a [`BindingError`] and no call.

use crate::error::BindingError;
use crate::params::{ParameterDescriptor, ParameterKind, Parameters};
use crate::value::Value;
use std::collections::BTreeMap;

/// The typed arguments for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundCall {
    pub positional: Vec<Value>,
    /// Only options actually present on the line.
    pub keyword: BTreeMap<String, Value>,
}

pub fn bind(
    tokens: &[String],
    params: &Parameters,
    marker: &str,
) -> Result<BoundCall, BindingError> {
    let mut rest = tokens;
    let mut options: Vec<(&ParameterDescriptor, &str)> = Vec::new();

    while let [first, value, ..] = rest {
        let Some(name) = first.strip_prefix(marker).filter(|n| !n.is_empty()) else {
            break;
        };
        match params.get(name) {
            Some(d) if d.kind == ParameterKind::KeywordOnly => {
                options.push((d, value.as_str()));
                rest = &rest[2..];
            }
            _ => break,
        }
    }

    let positional: Vec<&ParameterDescriptor> = params.positional().collect();
    let variadic = params.variadic();

    if variadic.is_none() && rest.len() > positional.len() {
        return Err(BindingError::TooManyArguments {
            expected: positional.len(),
            given: rest.len(),
        });
    }

    let mut call = BoundCall::default();

    for (i, descriptor) in positional.iter().enumerate() {
        let value = match rest.get(i) {
            Some(token) => coerce(descriptor, token)?,
            None => descriptor
                .default
                .clone()
                .ok_or_else(|| BindingError::MissingArgument(descriptor.name.clone()))?,
        };
        call.positional.push(value);
    }

    if let Some(descriptor) = variadic {
        for token in rest.iter().skip(positional.len()) {
            call.positional.push(coerce(descriptor, token)?);
        }
    }

    for (descriptor, token) in options {
        call.keyword
            .insert(descriptor.name.clone(), coerce(descriptor, token)?);
    }

    Ok(call)
}

fn coerce(descriptor: &ParameterDescriptor, token: &str) -> Result<Value, BindingError> {
    descriptor
        .coercion
        .apply(token)
        .map_err(|cause| BindingError::CoercionFailed {
            parameter: descriptor.name.clone(),
            token: token.to_string(),
            coercion: descriptor.coercion.name().to_string(),
            cause,
        })
}

/// What a handler sees: the bound call, read through its parameter list.
///
/// Lookups by name fall back to the declared default of a keyword-only parameter that
/// was not given, which is how an omitted option gets its value.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    call: &'a BoundCall,
    params: &'a Parameters,
}

impl<'a> Args<'a> {
    pub fn new(call: &'a BoundCall, params: &'a Parameters) -> Self {
        Self { call, params }
    }

    pub fn call(&self) -> &'a BoundCall {
        self.call
    }

    pub fn params(&self) -> &'a Parameters {
        self.params
    }

    /// Value of a positional, keyword-only or raw-line parameter.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let descriptor = self.params.get(name)?;
        match descriptor.kind {
            ParameterKind::Positional | ParameterKind::RawLine => descriptor
                .position
                .and_then(|p| self.call.positional.get(p)),
            ParameterKind::KeywordOnly => self
                .call
                .keyword
                .get(name)
                .or(descriptor.default.as_ref()),
            ParameterKind::Variadic => None,
        }
    }

    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Values collected by the variadic parameter.
    pub fn rest(&self) -> &'a [Value] {
        if self.params.variadic().is_none() {
            return &[];
        }
        let start = self.params.positional().count();
        self.call.positional.get(start..).unwrap_or(&[])
    }

    /// The untokenized line of a raw-mode command.
    pub fn line(&self) -> Option<&'a str> {
        if self.params.is_raw() {
            self.call.positional.first().and_then(Value::as_str)
        } else {
            None
        }
    }
}
