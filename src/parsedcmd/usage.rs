//! # Usage Text
//!
//! Renders a parameter list as a one-line synopsis:
//!
//! ```text
//! print [-flag F(=true)] [-repeat R(=1)] [LINE(=abc)]
//! multiply MUL [*NUMS]
//! shell LINE...
//! ```
//!
//! Options come first because that is the only place they are recognised.

use crate::params::{ParameterDescriptor, ParameterKind, Parameters};

/// Synopsis followed by the command's documentation, verbatim.
pub fn format(command: &str, params: &Parameters, doc: &str, marker: &str) -> String {
    let mut out = synopsis(command, params, marker);
    let doc = doc.trim_end();
    if !doc.is_empty() {
        out.push('\n');
        out.push_str(doc);
    }
    out
}

pub fn synopsis(command: &str, params: &Parameters, marker: &str) -> String {
    let descriptors = params.descriptors();
    let options = descriptors
        .iter()
        .filter(|d| d.kind == ParameterKind::KeywordOnly)
        .map(|d| option(d, marker));
    let positional = descriptors
        .iter()
        .filter(|d| d.kind != ParameterKind::KeywordOnly)
        .map(argument);

    std::iter::once(command.to_string())
        .chain(options)
        .chain(positional)
        .collect::<Vec<_>>()
        .join(" ")
}

fn option(d: &ParameterDescriptor, marker: &str) -> String {
    let placeholder: String = d
        .name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    match &d.default {
        Some(default) => format!("[{}{} {}(={})]", marker, d.name, placeholder, default),
        None => format!("[{}{} {}]", marker, d.name, placeholder),
    }
}

fn argument(d: &ParameterDescriptor) -> String {
    let name = d.name.to_uppercase();
    match (d.kind, &d.default) {
        (ParameterKind::Variadic, _) => format!("[*{}]", name),
        (ParameterKind::RawLine, _) => format!("{}...", name),
        (_, Some(default)) => format!("[{}(={})]", name, default),
        (_, None) => name,
    }
}
