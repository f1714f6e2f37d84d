//! Where reloaded bytes come from.

mod reader;

pub use reader::{FileReader, FsReader};
