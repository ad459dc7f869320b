//! Type-safe wrappers for seasons and team codes.

pub mod ids;
pub mod time;
