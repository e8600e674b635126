//! API clients for external services
//!
//! - TMDB: Movie/TV catalog lists, details and search

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};
