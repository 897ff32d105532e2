pub mod connection;
pub mod donate;
pub mod layout;
