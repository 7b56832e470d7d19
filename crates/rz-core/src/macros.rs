/// Macro to return early with a malformed-program error unless the condition holds
#[macro_export]
macro_rules! ensure_wellformed {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::error::Error::MalformedProgram(format!($($arg)*)));
        }
    };
}

/// Log a warning message
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

/// Log a debug message
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!($($arg)*)
    };
}

/// Log an info message
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

/// Log a trace message
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::tracing::trace!($($arg)*)
    };
}

/// Combine any number of hashable values into one structural hash.
///
/// `mhash!(a, b, c)` is order sensitive and stable across processes.
#[macro_export]
macro_rules! mhash {
    () => {
        $crate::hash::StructuralHasher::new().finish_hash()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut hasher = $crate::hash::StructuralHasher::new();
        $( hasher.write_value(&$value); )+
        hasher.finish_hash()
    }};
}
