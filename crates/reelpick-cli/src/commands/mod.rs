pub mod apply;
pub mod config;
pub mod context;
pub mod movies;
pub mod onboard;
pub mod prefs;
pub mod prompts;
pub mod render;
pub mod spinner;
