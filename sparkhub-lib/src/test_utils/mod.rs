//! Test utilities for SparkHub.
//!
//! - Address fixtures with their expected identity keys
//! - The vault known-answer vector
//! - [`TestHarness`]: a resolver wired to an in-memory registry and a mock wallet
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sparkhub_lib::test_utils::{TestFixtures, TestHarness};
//!
//! let harness = TestHarness::new("sparkhub.example").await;
//! harness.registry.claim("alice", TestFixtures::MAINNET_ADDRESS).await?;
//! let outcome = harness.resolver.callback(Some("alice"), Some("5000"), None).await?;
//! ```

mod fixtures;
mod harness;

pub use fixtures::{KnownAnswer, TestFixtures};
pub use harness::TestHarness;
