pub mod dns;
pub mod http;
pub mod persistence;
pub mod provider;
