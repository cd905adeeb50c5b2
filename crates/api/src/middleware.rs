/// Error type and HTTP mapping for handler failures
pub mod error_handling;
