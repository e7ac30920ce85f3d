pub mod api;
pub mod app;
pub mod config;
pub mod events;
pub mod form;
pub mod logging;
pub mod ui;
