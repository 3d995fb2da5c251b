pub mod collections;
pub mod config;
pub mod keys;
pub mod log;
pub mod prefs;
