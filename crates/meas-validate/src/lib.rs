//! Plausibility bounds validation.
//!
//! Two tiers, configured independently:
//!
//! - **confidence**: the narrower range of typical, trustworthy results
//! - **possible**: the wider range used to reject likely unit or entry errors
//!
//! The tiers are tuned independently per measurement type and are not
//! guaranteed to nest; neither flag implies or overrides the other.

pub mod bounds;

pub use bounds::{BoundsFlags, BoundsValidator};
