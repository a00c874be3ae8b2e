pub mod asset;
pub mod check;
pub mod commands;
pub mod descriptor;
pub mod github;
pub mod http;
pub mod launcher;
pub mod platform;

/// Distribution prefix shared by release asset names and descriptor names.
pub const DISTRIBUTION: &str = "cpython";
