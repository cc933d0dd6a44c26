pub mod engine;
pub mod entrypoint;
pub mod model;
pub mod service;
pub mod store;
