//! View-facing state plumbing.

pub mod mvi;
