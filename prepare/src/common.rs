//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context, Error, Result};
pub use futures::stream::{self, Stream, StreamExt as _, TryStreamExt as _};
pub use indexmap::IndexSet;
pub use itertools::Itertools;
pub use log::info;
pub use noisy_float::prelude::*;
pub use par_stream::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Borrow,
    collections::HashSet,
    fmt::Debug,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    pin::Pin,
    sync::Arc,
};
pub use tch::{Device, Kind, Tensor};
pub use tch_tensor_like::TensorLike;

pub type Fallible<T> = Result<T, Error>;
