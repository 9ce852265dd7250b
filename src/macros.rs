//! Logging shims that compile to nothing without the `tracing` feature.

/// Emits a `tracing::trace!` event when the `tracing` feature is enabled.
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

/// Emits a `tracing::debug!` event when the `tracing` feature is enabled.
macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!($($arg)*);
        }
    };
}

pub(crate) use debug;
pub(crate) use trace;
