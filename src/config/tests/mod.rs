//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `cli_flags`: Loading from short and long command-line flags
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `operation_mode`: Command selection and inference tests
//! - `field_resolution`: Token, locator, and command input resolution tests
//! - `validation`: Configuration consistency validation tests

mod helpers;
mod operation_mode;
mod validation;
