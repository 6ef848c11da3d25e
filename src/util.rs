//! Shared numeric utilities used by the scorers.

pub mod simd;
