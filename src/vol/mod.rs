pub mod core;
#[allow(unused_imports)]
pub use core::{LabelVol, Vol};

// Optional extras
// -----------------------------------------------------------------------------

#[cfg(feature = "vol-io")]
pub mod io;
