//! oobwatch CLI Library
//!
//! Requests interaction endpoints from a correlation service, polls it for
//! recorded interactions and reports them on the console and to a file.

pub mod app;
pub mod banner;
pub mod cli;
pub mod shutdown;
