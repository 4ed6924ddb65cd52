//! Logging helpers.

use slog::Logger;

/// Extension trait for `slog::Logger`
pub trait LoggerExtensions {
    /// Create a child logger with a `src` key holding the short name of `T`.
    fn new_with_component_name<T>(&self) -> Self;
}

impl LoggerExtensions for Logger {
    fn new_with_component_name<T>(&self) -> Self {
        self.new(slog::o!("src" => short_type_name::<T>()))
    }
}

/// Name of `T` without its module path nor its generic arguments.
fn short_type_name<T>() -> &'static str {
    let full_name = std::any::type_name::<T>();
    let without_generics = full_name.split('<').next().unwrap_or(full_name);

    without_generics.rsplit("::").next().unwrap_or(without_generics)
}
