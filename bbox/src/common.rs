pub use anyhow::{bail, ensure, Result};
pub use num_traits::{Float, Num, NumCast, ToPrimitive, Zero};
pub use std::ops::{Mul, Neg};
