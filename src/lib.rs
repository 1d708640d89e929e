pub mod client;
pub mod config;
pub mod format;
pub mod logging;
pub mod payload;
pub mod refresh;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod styling;
pub mod terminal;
pub mod view;
