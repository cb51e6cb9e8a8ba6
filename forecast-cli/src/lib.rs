// Library exports for the student forecast CLI
// This allows testing of internal modules

pub mod api;
pub mod commands;
pub mod config;
pub mod form;
pub mod models;
pub mod session;
pub mod storage;
pub mod ui;
