//! Request middleware.
//!
//! Purpose: lifecycle concerns that apply to every request, currently
//! request correlation.

pub mod trace;

pub use trace::Trace;
