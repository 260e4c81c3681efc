//! Dataset listing and access toolkit.

mod dataset_;
mod kitti_;
mod on_demand;
mod record;
mod sanitized;
mod streaming;
mod utils;

pub use dataset_::*;
pub use kitti_::*;
pub use on_demand::*;
pub use record::*;
pub use sanitized::*;
pub use streaming::*;
pub use utils::*;
