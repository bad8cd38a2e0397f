//! Speed-ordered result set and the windowed line buffer drawn from it.

pub mod line;
pub mod result_set;
pub mod viewport;

pub use line::{flatten_into, DisplayLine, LineKind};
pub use result_set::ResultSet;
pub use viewport::Viewport;
