pub mod client;
pub mod crud;
pub mod manager;
pub mod query;
pub mod store;

#[cfg(test)]
pub mod memory;
