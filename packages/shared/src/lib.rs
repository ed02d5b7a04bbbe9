//! Utilities shared by the Hibiki server and client binaries.

pub mod logger;
pub mod time;
