//! Data preprocessing building blocks.

pub mod color_jitter;
pub mod loader;
pub mod normalize;
pub mod random_flip;
mod tensor;

pub use color_jitter::*;
pub use loader::*;
pub use normalize::*;
pub use random_flip::*;
pub use tensor::*;
