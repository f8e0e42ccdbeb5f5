pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod fetcher;
pub mod models;
pub mod screen;

#[cfg(test)]
pub(crate) mod testing;
