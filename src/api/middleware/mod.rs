//! API middleware.

mod error_log;

pub use error_log::log_server_errors;
