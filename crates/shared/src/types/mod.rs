//! Common types used across the application.

pub mod amounts;
pub mod id;
pub mod pagination;

pub use amounts::{BALANCE_TOLERANCE, is_balanced, round_amount};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
