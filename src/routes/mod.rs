//! Server-rendered page routes

pub mod health;
