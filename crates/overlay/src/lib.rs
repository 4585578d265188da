pub mod fallback;
pub mod gesture;
pub mod projector;
pub mod view;

pub use fallback::*;
pub use gesture::*;
pub use projector::*;
pub use view::*;
