//! Tempguard Server - HTTP front end for the disposable detectors
//!
//! This crate handles:
//! - Request shape validation for email and phone checks
//! - Mapping detector verdicts to JSON responses
//! - Health reporting for both list caches

pub mod config;
pub mod routes;
