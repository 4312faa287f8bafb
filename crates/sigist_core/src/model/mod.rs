//! Domain model for collected user records and email signups.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once at creation and never mutated.
//! - Records have no update or delete lifecycle; only create and read exist.

pub mod email;
pub mod filter;
pub mod record;
