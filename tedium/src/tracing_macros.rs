//! Logging macros that forward to `tracing` when the `tracing` feature is
//! enabled and compile to nothing otherwise.

#[cfg(feature = "tracing")]
#[macro_export]
#[doc(hidden)]
macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "tracing")]
#[macro_export]
#[doc(hidden)]
macro_rules! trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}
