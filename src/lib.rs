pub mod action;
pub mod api;
pub mod artwork;
pub mod audio;
pub mod cache;
pub mod config;
pub mod detail_view;
pub mod effect;
pub mod error;
pub mod filter;
pub mod logging;
pub mod navigator;
pub mod reducer;
pub mod route;
pub mod state;
pub mod theme;
pub mod ui;
pub mod units;
