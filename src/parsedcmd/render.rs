//! Diagnostic text for lines that could not be dispatched.
//!
//! Every diagnostic line starts with `*** `. Long lines are filled to
//! [`DIAGNOSTIC_WIDTH`] display columns.

use crate::error::BindingError;
use unicode_width::UnicodeWidthStr;

pub const DIAGNOSTIC_WIDTH: usize = 72;
const PREFIX: &str = "*** ";

pub fn binding_error(err: &BindingError, line: &str, tokens: &[String]) -> String {
    match err {
        BindingError::UnknownCommand(_) => format!("{}Unknown syntax: {}", PREFIX, line),
        BindingError::CoercionFailed {
            parameter,
            token,
            coercion,
            cause,
        } => {
            let header = format!(
                "While trying to cast \"{}\" with \"{}\" for argument \"{}\", the following error occurred:",
                token, coercion, parameter
            );
            format!(
                "{}\n{}{}",
                fill(&header, DIAGNOSTIC_WIDTH, PREFIX),
                PREFIX,
                cause
            )
        }
        BindingError::Tokenize(err) => format!("{}{}", PREFIX, err),
        other => format!(
            "{}This argument list could not be bound: {:?}\n{}{}",
            PREFIX, tokens, PREFIX, other
        ),
    }
}

pub fn handler_error(err: &anyhow::Error) -> String {
    format!("{}{:#}", PREFIX, err)
}

/// Word-wrap `text` to `width` columns, prefixing every line with `indent`.
pub fn fill(text: &str, width: usize, indent: &str) -> String {
    let indent_width = indent.width();
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::from(indent);
    let mut current_width = indent_width;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if current_width > indent_width && current_width + 1 + word_width > width {
            lines.push(std::mem::replace(&mut current, String::from(indent)));
            current_width = indent_width;
        }
        if current_width > indent_width {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }
    lines.push(current);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::Coercion;

    #[test]
    fn unknown_command_echoes_line() {
        let err = BindingError::UnknownCommand("frob".into());
        assert_eq!(
            binding_error(&err, "frob 1 2", &[]),
            "*** Unknown syntax: frob 1 2"
        );
    }

    #[test]
    fn bind_failure_lists_tokens() {
        let err = BindingError::MissingArgument("mul".into());
        let text = binding_error(&err, "multiply", &[]);
        assert_eq!(
            text,
            "*** This argument list could not be bound: []\n*** missing required argument `mul`"
        );
    }

    #[test]
    fn coercion_failure_is_filled() {
        let cause = Coercion::integer().apply("x").unwrap_err();
        let err = BindingError::CoercionFailed {
            parameter: "nums".into(),
            token: "x".into(),
            coercion: "int".into(),
            cause,
        };
        let text = binding_error(&err, "multiply 1 x", &["1".into(), "x".into()]);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() >= 3);
        assert!(lines.iter().all(|l| l.starts_with("*** ")));
        assert!(lines.iter().all(|l| l.width() <= DIAGNOSTIC_WIDTH));
        assert!(text.contains("\"x\""));
        assert!(lines.last().unwrap().contains("invalid digit"));
    }

    #[test]
    fn fill_wraps_on_words() {
        let text = fill("aaa bbb ccc", 11, "> ");
        assert_eq!(text, "> aaa bbb\n> ccc");
    }

    #[test]
    fn fill_keeps_long_words_whole() {
        assert_eq!(fill("abcdefghij", 4, ""), "abcdefghij");
    }

    #[test]
    fn fill_measures_display_width() {
        // Each CJK character is two columns wide.
        assert_eq!(fill("日本 語", 6, ""), "日本\n語");
    }
}
