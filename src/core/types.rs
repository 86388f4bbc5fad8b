/*!
 * Core Types
 * Common types used across the crate
 */

/// Size type for buffer arithmetic and transfer counts
pub type Size = usize;
