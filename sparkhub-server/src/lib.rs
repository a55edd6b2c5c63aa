//! SparkHub server library exports for testing.
//!
//! This module re-exports internal components to enable integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
