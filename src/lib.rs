pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
