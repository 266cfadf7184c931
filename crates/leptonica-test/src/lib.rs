//! leptonica-test - Regression test harness
//!
//! This crate provides a small regression test framework in the spirit of
//! the C version's regutils.c, supporting two modes:
//!
//! - **Compare**: Record a failure whenever a checked value or image differs
//! - **Display**: Run the checks and print results without failing
//!
//! Every [`RegParams`] also installs a `tracing` subscriber that writes to the
//! test output, so library log events show up with `RUST_LOG=debug`.
//!
//! # Usage
//!
//! ```ignore
//! use leptonica_test::RegParams;
//!
//! let mut rp = RegParams::new("watershed");
//! rp.compare_values(2.0, basin_count as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"
//! - `RUST_LOG`: Filter for library log output (e.g. `leptonica_region=debug`)

mod params;

pub use params::{RegParams, RegTestMode};
