// Library root: the provider, its HTTP client and the state store.
// `src/main.rs` is a thin command-line host over these modules.

pub mod client;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod provider;
pub mod store;

// Only needed by the binary, but public so integration tests can drive
// configuration the same way `main.rs` does.
pub mod cli;
pub mod config;
pub mod logging;
