//! # VS Test Utilities
//!
//! Shared test utilities for the Video Source service.
//!
//! This crate provides:
//! - Server test harness (`TestVsServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vs_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestVsServer::spawn().await?;
//!
//!     let response = reqwest::get(format!("{}/video?duration=100", server.url())).await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
