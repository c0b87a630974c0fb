//! Historical series preparation.
//!
//! Turns caller-supplied observations (any order, possibly with gaps) into the
//! index-aligned arrays the models consume. No modeling happens here.

pub mod calendar;
pub mod normalize;

pub use calendar::*;
pub use normalize::*;
