pub mod admin;
pub mod calculator;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod helpers;
