//! Safe bounding box types and functions.

mod common;

pub use rect::*;
pub mod rect;

pub use ltrb::*;
pub mod ltrb;

pub use cxcywh::*;
pub mod cxcywh;

pub use size::*;
pub mod size;

pub use transform::*;
pub mod transform;

pub use label::*;
pub mod label;

pub mod prelude {
    pub use crate::rect::{Rect, RectFloat, RectNum};
}
