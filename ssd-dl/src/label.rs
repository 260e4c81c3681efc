use bbox::{CxCyWH, Label, LTRB};
use noisy_float::prelude::*;

/// A labeled box in pixel units of the source image.
pub type PixelLabel = Label<LTRB<R64>, usize>;

/// A labeled box in ratio units of the canonical frame.
pub type RatioLabel = Label<CxCyWH<R64>, usize>;
