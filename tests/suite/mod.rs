//! Integration test suites, one module per area.

mod persistence;
mod provider;
mod session;
