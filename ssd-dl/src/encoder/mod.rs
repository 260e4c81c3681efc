//! Anchor encoding toolkit.
//!
//! It turns a variable number of labeled boxes into fixed-size location and
//! class targets aligned to a predefined set of prior boxes.

mod prior_box;
mod target_encoder;

pub use prior_box::*;
pub use target_encoder::*;
