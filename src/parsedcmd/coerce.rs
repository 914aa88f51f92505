//! # Coercions
//!
//! A [`Coercion`] turns one token into a typed [`Value`]. Coercions are supplied by the
//! code registering a command, per parameter; this module only ships the handful every
//! shell needs. Parameters without a coercion receive their token unchanged
//! ([`Coercion::string`]).

use crate::error::CoerceCause;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type CoerceFn = dyn Fn(&str) -> Result<Value, CoerceCause> + Send + Sync;

/// A named unary function from token to value.
///
/// The name only shows up in diagnostics.
#[derive(Clone)]
pub struct Coercion {
    name: String,
    func: Arc<CoerceFn>,
}

impl Coercion {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, CoerceCause> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, token: &str) -> Result<Value, CoerceCause> {
        (self.func)(token)
    }

    /// Identity: the token is passed through as a string.
    pub fn string() -> Self {
        Self::new("str", |token| Ok(Value::Str(token.to_string())))
    }

    pub fn integer() -> Self {
        Self::new("int", |token| Ok(Value::Int(token.trim().parse::<i64>()?)))
    }

    pub fn float() -> Self {
        Self::new("float", |token| Ok(Value::Float(token.trim().parse::<f64>()?)))
    }

    /// A lenient boolean: only `off`, `false`, `f` and `0` (any case) are false.
    pub fn boolean() -> Self {
        Self::new("boolean", |token| Ok(Value::Bool(boolean(token))))
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Coercion").field(&self.name).finish()
    }
}

impl Default for Coercion {
    fn default() -> Self {
        Self::string()
    }
}

const FALSE_WORDS: [&str; 4] = ["off", "false", "f", "0"];

pub fn boolean(token: &str) -> bool {
    let lowered = token.to_lowercase();
    !FALSE_WORDS.contains(&lowered.as_str())
}
