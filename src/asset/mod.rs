//! Asset selection module
//!
//! Picks the single release asset that corresponds to a platform and
//! interpreter version, using the marker and flavor fragments from the
//! platform table.

mod picker;

pub use picker::{AssetPicker, SelectionError};
