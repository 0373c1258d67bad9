pub mod activity;
pub mod auth;
pub mod booking;
pub mod health;
