use rz_core::error::Error;
use rz_core::ir::Type;

/// Create a simple optimization error
pub fn optimization_error(message: impl Into<String>) -> Error {
    Error::Generic(message.into())
}

/// Create an optimization error attributed to a named pass
pub fn optimization_error_in_pass(message: impl Into<String>, pass: &str) -> Error {
    Error::Generic(format!("{} (in pass {})", message.into(), pass))
}

/// A result type the rewrite cannot decompose
pub fn unsupported_result_type(ty: &Type) -> Error {
    Error::UnsupportedResultType(ty.to_string())
}

/// Create a generic error (when we don't have specific error information)
pub fn generic_error(message: impl Into<eyre::Report>) -> Error {
    Error::from(message.into())
}

/// Macro to return early with an optimization error
#[macro_export]
macro_rules! opt_bail {
    ($message:expr) => {
        return Err($crate::error::optimization_error($message))
    };
}

/// Macro to ensure a condition is true, or return an optimization error
#[macro_export]
macro_rules! opt_ensure {
    ($cond:expr, $message:expr) => {
        if !($cond) {
            $crate::opt_bail!($message);
        }
    };
}
