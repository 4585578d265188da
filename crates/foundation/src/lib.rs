pub mod math;
pub mod rect;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use rect::*;
pub use time::*;
