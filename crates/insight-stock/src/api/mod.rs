//! Exchange API client and snapshot files

pub mod nse;

pub use nse::{NseClient, load_snapshot, save_snapshot};
