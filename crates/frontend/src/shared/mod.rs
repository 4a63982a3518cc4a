pub mod api_utils;
pub mod config;
pub mod date_utils;
pub mod debounce;
pub mod notify;
pub mod optimistic;
