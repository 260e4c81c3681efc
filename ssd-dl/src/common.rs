pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use futures::stream::{self, Stream, StreamExt as _, TryStreamExt as _};
pub use indexmap::IndexSet;
pub use itertools::{iproduct, izip, Itertools as _};
pub use log::warn;
pub use noisy_float::prelude::*;
pub use rand::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Borrow,
    collections::HashSet,
    fmt::Debug,
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    sync::Arc,
};
pub use tch::{vision, Device, Kind, Tensor};
pub use tch_tensor_like::TensorLike;
