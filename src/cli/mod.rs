//! Command-line workflows behind the `release-kit` binary

pub mod orchestration;
