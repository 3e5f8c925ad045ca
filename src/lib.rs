//! titloc: extract landed-title localisation attributes and assign every
//! title to a geographic region.
//!
//! Layers, inside out:
//! - [`domain`]: title trees, region resolution, attribute tables (no I/O)
//! - [`application`]: the extraction service and its parse cache
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: argument parsing, dispatch and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
