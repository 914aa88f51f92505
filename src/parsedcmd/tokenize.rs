use crate::error::TokenizeError;

/// Splits the argument part of a line into tokens.
pub trait Tokenizer {
    fn tokenize(&self, line: &str) -> Result<Vec<String>, TokenizeError>;
}

/// POSIX-shell-like splitting with quotes and backslash escapes.
///
/// NUL characters are removed from every token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellWords;

impl Tokenizer for ShellWords {
    fn tokenize(&self, line: &str) -> Result<Vec<String>, TokenizeError> {
        let tokens =
            shlex::split(line).ok_or_else(|| TokenizeError::Unbalanced(line.to_string()))?;
        Ok(tokens.into_iter().map(|t| t.replace('\0', "")).collect())
    }
}

/// Splits on whitespace only; quotes are ordinary characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Whitespace;

impl Tokenizer for Whitespace {
    fn tokenize(&self, line: &str) -> Result<Vec<String>, TokenizeError> {
        Ok(line.split_whitespace().map(String::from).collect())
    }
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Result<Vec<String>, TokenizeError>,
{
    fn tokenize(&self, line: &str) -> Result<Vec<String>, TokenizeError> {
        self(line)
    }
}
