//! This module contains the macro for declaring log targets for the [`tracing`] crate
//! Used in macros like [`tracing::debug`], as `debug!(target: BVH, ...)`

/// Declares one `&'static str` constant per log target.
///
/// Every target is prefixed with the package name, so that they can be filtered
/// as `raycast_engine::bvh=debug` with an env filter.
/// If no value is given, the name of the constant is used as the suffix.
#[macro_export]
macro_rules! tracing_targets {
    {$( $name:ident $(=$val:expr)? ),* $(,)?} => {
        $( $crate::tracing_targets!(@value $name $(=$val)? ); )*
    };

    (@value $name:ident = $val:expr) => {pub const $name: &'static str = concat!(env!("CARGO_PKG_NAME"), "::", $val);};
    (@value $name:ident)             => {$crate::tracing_targets!($name = stringify!($name));};
}
