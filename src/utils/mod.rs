//! Utility modules for the balance checker
//!
//! This module contains utility functions for template discovery and output
//! formatting.

pub mod file_utils;
pub mod output_formatter;
