//! Logging macros that work on both WASM and native targets.
//!
//! | Macro | WASM | Native |
//! |-------|------|--------|
//! | `info_log!` | `console.info` | `eprintln!` |
//! | `warn_log!` | `console.warn` | `eprintln!` |
//! | `error_log!` | `console.error` | `eprintln!` |
//!
//! All of them compile to nothing without `debug_assertions`.

/// Logs an info message.
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        web_sys::console::info_1(&format!($($arg)*).into());
    }};
}

/// Logs an info message.
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        eprintln!("[INFO] {}", format!($($arg)*));
    }};
}

/// No-op info_log in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

/// Logs a warning.
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! warn_log {
    ($($arg:tt)*) => {{
        web_sys::console::warn_1(&format!($($arg)*).into());
    }};
}

/// Logs a warning.
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! warn_log {
    ($($arg:tt)*) => {{
        eprintln!("[WARN] {}", format!($($arg)*));
    }};
}

/// No-op warn_log in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! warn_log {
    ($($arg:tt)*) => {{}};
}

/// Logs an error with diagnostic detail.
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! error_log {
    ($($arg:tt)*) => {{
        web_sys::console::error_1(&format!($($arg)*).into());
    }};
}

/// Logs an error with diagnostic detail.
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! error_log {
    ($($arg:tt)*) => {{
        eprintln!("[ERROR] {}", format!($($arg)*));
    }};
}

/// No-op error_log in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! error_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(test)]
mod tests {
    use crate::{error_log, info_log, warn_log};

    #[test]
    fn logging_macros_accept_format_args() {
        info_log!("Mounted {} slides", 6);
        warn_log!("Missing element: {:?}", ".toast-container");
        error_log!("Request failed: {}", "timeout");
        info_log!("plain message");
    }
}
