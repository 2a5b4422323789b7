pub mod cache;
pub mod client;
pub mod config;
pub mod i18n;
pub mod options;
pub mod retry;
pub mod security;
pub mod server;
pub mod state;
pub mod translator;
