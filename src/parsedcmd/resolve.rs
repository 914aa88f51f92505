//! # Signature Resolution
//!
//! Finds the function whose parameter list describes how a command's line is parsed.
//!
//! Starting at the function bound to the command, resolution follows
//! [wrapping links](crate::function::Function::wraps) inward and halts at the first
//! function that either wraps nothing or is marked
//! [`use_own_signature`](crate::function::Function::use_own_signature).
//!
//! Links are names looked up in a [`FunctionTable`], so a cycle is representable.
//! A walk can visit each declared function at most once; a walk that takes more steps
//! than the table has entries has revisited something and fails with
//! [`ResolutionError::Cycle`].

use crate::error::ResolutionError;
use crate::function::Function;
use std::collections::HashMap;

/// Every function declared with the shell, keyed by name.
#[derive(Debug, Default)]
pub struct FunctionTable {
    functions: HashMap<String, Function>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, function: Function) -> Result<(), ResolutionError> {
        if self.functions.contains_key(function.name()) {
            return Err(ResolutionError::DuplicateFunction(function.name().to_string()));
        }
        self.functions.insert(function.name().to_string(), function);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }
}

/// Resolve `start` to its canonical function.
pub fn resolve<'a>(table: &'a FunctionTable, start: &str) -> Result<&'a Function, ResolutionError> {
    let mut current = table
        .get(start)
        .ok_or_else(|| ResolutionError::UnknownFunction {
            wrapper: start.to_string(),
            inner: start.to_string(),
        })?;

    let mut steps = 0;
    loop {
        if current.stops_here() {
            return Ok(current);
        }
        let Some(inner) = current.wrapped() else {
            return Ok(current);
        };

        steps += 1;
        if steps > table.len() {
            return Err(ResolutionError::Cycle {
                start: start.to_string(),
                repeated: inner.to_string(),
            });
        }

        current = table
            .get(inner)
            .ok_or_else(|| ResolutionError::UnknownFunction {
                wrapper: current.name().to_string(),
                inner: inner.to_string(),
            })?;
    }
}
