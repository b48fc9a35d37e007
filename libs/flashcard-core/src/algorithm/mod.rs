//! Study-queue ordering.
//!
//! Cards carry a floating-point rank and are studied in ascending order. A
//! rating moves one card to a new rank derived from its neighbours at a
//! rating-dependent position, so no other card is renumbered.

pub mod reorder;

pub use reorder::{Placement, Window};
