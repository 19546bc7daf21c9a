pub mod chat;
pub mod config;
pub mod context;
pub mod intent;
pub mod persona;
pub mod response;
pub mod session;
pub mod workspace;
