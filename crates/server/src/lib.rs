pub mod auth;
pub mod config;
pub mod error_convert;
pub mod health;
pub mod openapi;
pub mod repo;
pub mod rest;
pub mod state;
pub mod telemetry;
