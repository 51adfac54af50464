pub mod app;
pub mod client;
pub mod config;
pub mod db;
pub mod dishes;
pub mod health;
pub mod nutrition;
pub mod recommendations;
pub mod state;
pub mod users;
