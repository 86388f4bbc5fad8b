/*!
 * Limits and Constants
 *
 * Centralized location for capacity limits and defaults.
 * All values include rationale comments explaining why they exist.
 */

use crate::core::types::Size;

/// Default ring capacity (4KB)
/// Matches the classic one-page pipe buffer; one slot stays reserved, so the
/// default usable payload is 4095 bytes
pub const DEFAULT_PIPE_CAPACITY: Size = 4096;

/// Smallest accepted ring capacity (2 bytes)
/// Empty/full disambiguation reserves one slot, so capacity 2 is the minimum
/// that can carry a single payload byte
pub const MIN_PIPE_CAPACITY: Size = 2;

/// Largest accepted ring capacity (1MB)
/// Guards against runaway allocations from misconfigured callers
pub const MAX_PIPE_CAPACITY: Size = 1024 * 1024;
