//! Verification tools for mesh spacing results.
//!
//! # Key Components
//!
//! - [`oracle`]: checks returning pass/fail verdicts instead of panicking
//! - [`bottom_up`]: an independent node-count search used to cross-check
//!   the geometric solver

pub mod bottom_up;
pub mod oracle;

pub use bottom_up::{bottom_up, BottomUpFit};
pub use oracle::OracleVerdict;
