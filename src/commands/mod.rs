pub mod config;
pub mod db;
pub mod exercise;
pub mod onboard;
pub mod status;
pub mod workout;
