//! Core module for delimiter checking
//!
//! This module contains the delimiter scanning helpers and the checker that
//! turns a template file into a report.

pub mod checker;
pub mod delimiters;
