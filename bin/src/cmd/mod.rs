//! CLI subcommand modules.
//!
//! This module contains the implementations for all sirocco CLI subcommands.

pub(crate) mod backtest;
pub(crate) mod signal;
