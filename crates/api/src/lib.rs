//! Incubator Hub API library.
//!
//! This crate provides the REST backend as a library so the router can be
//! exercised in tests and the CLI can reuse the database layer.
//!
//! # Security
//!
//! - Passwords are hashed with Argon2id
//! - Sessions are stateless HS256 tokens; admin tokens carry the admin role
//! - Startups can log in only once an admin has approved their application

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
