//! Helpers for the end-to-end test suite. The scenarios themselves live in `tests/features`.
pub mod helpers;
