use thiserror::Error;

/// Boxed failure returned by a coercion function.
pub type CoerceCause = Box<dyn std::error::Error + Send + Sync>;

/// A declaration could not be turned into a parameter model.
///
/// These are programmer errors and are surfaced when the registry is built,
/// never while dispatching a line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("wrapping chain starting at `{start}` does not terminate (cycle through `{repeated}`)")]
    Cycle { start: String, repeated: String },

    #[error("`{wrapper}` wraps `{inner}`, which was never declared")]
    UnknownFunction { wrapper: String, inner: String },

    #[error("command `{0}` is registered twice")]
    DuplicateCommand(String),

    #[error("function `{0}` is declared twice")]
    DuplicateFunction(String),

    #[error("invalid command name {0:?}")]
    InvalidCommandName(String),

    #[error("command `{command}` is bound to `{function}`, which has no body")]
    MissingBody { command: String, function: String },

    #[error("invalid option marker {0:?}")]
    InvalidMarker(String),

    #[error("`{function}` declares parameter `{parameter}` twice")]
    DuplicateParameter { function: String, parameter: String },

    #[error("`{function}`: receiver `{parameter}` must be the first parameter")]
    MisplacedReceiver { function: String, parameter: String },

    #[error("`{function}`: variadic `{parameter}` must be the last positional parameter")]
    MisplacedVariadic { function: String, parameter: String },

    #[error("`{function}`: required parameter `{parameter}` follows an optional one")]
    RequiredAfterOptional { function: String, parameter: String },

    #[error("`{function}`: annotation for unknown parameter `{parameter}`")]
    UnknownAnnotation { function: String, parameter: String },

    #[error("`{function}`: `{parameter}` cannot be made keyword-only")]
    InvalidKeywordOnly { function: String, parameter: String },
}

/// The raw line could not be split into tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unbalanced quoting or trailing escape in {0:?}")]
    Unbalanced(String),
}

/// A line could not be turned into a call of its command.
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// Never produced by [`crate::bind::bind`], whose option scan simply stops at a
    /// token it does not recognise. Available to custom binders.
    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("takes at most {expected} positional arguments ({given} given)")]
    TooManyArguments { expected: usize, given: usize },

    #[error("missing required argument `{0}`")]
    MissingArgument(String),

    #[error("cannot cast {token:?} with {coercion} for argument `{parameter}`: {cause}")]
    CoercionFailed {
        parameter: String,
        token: String,
        coercion: String,
        #[source]
        cause: CoerceCause,
    },

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShellError>;
