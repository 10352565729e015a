pub mod app;
pub mod config;
pub mod mongo;
pub mod server;
pub mod utils;
pub mod validation;
