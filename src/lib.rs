pub mod api;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod selector;
pub mod table;
pub mod terminology;
pub mod view;
