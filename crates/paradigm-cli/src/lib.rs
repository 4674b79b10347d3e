//! Command-line front ends for the PARADIGM web API.
//!
//! `paradigm` talks to the current API and downloads the three result
//! artifacts; `paradigm-legacy` talks to the legacy API and pivots its
//! triple-list result into a TSV matrix.

pub mod cli;
pub mod exit_codes;
pub mod logging;
