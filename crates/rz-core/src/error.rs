use miette::Diagnostic;
use std::result;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand count or operand layout does not match the operator.
    #[error("Invalid operand for {op}: {message}")]
    #[diagnostic(code(razor::invalid_operand))]
    InvalidOperand { op: String, message: String },

    #[error("Output index {index} out of range for {op} with {num_outputs} output(s)")]
    #[diagnostic(code(razor::index_out_of_range))]
    IndexOutOfRange {
        op: String,
        index: usize,
        num_outputs: usize,
    },

    /// Operator-specific parameter validation failed.
    #[error("Unsupported configuration: {0}")]
    #[diagnostic(code(razor::unsupported_configuration))]
    UnsupportedConfiguration(String),

    #[error("Shape inference failed for {op}: {message}")]
    #[diagnostic(code(razor::shape_inference_failure))]
    ShapeInferenceFailure { op: String, message: String },

    #[error("Unsupported result type: {0}")]
    #[diagnostic(code(razor::unsupported_result_type))]
    UnsupportedResultType(String),

    /// Structural violation of a program: unbound variables, missing entry
    /// function, missing checked types and the like.
    #[error("Malformed program: {0}")]
    #[diagnostic(code(razor::malformed_program))]
    MalformedProgram(String),

    #[error("Generic error: {0}")]
    #[diagnostic(code(razor::generic))]
    Generic(String),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn invalid_operand(op: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidOperand {
            op: op.into(),
            message: message.into(),
        }
    }

    pub fn shape_inference(op: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ShapeInferenceFailure {
            op: op.into(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedProgram(message.into())
    }
}

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Generic(s.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
