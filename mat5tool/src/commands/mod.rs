//! Command implementations, one module per mode.

pub mod check;
pub mod convert;
pub mod list;
