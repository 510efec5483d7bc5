//! Core math modules.

pub mod correlation;
pub mod gaussian;
pub mod moments;
pub mod regression;
pub mod stable;
