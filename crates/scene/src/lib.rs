pub mod assets;
pub mod camera;
pub mod frame;
pub mod pins;
pub mod spin;

pub use assets::*;
pub use camera::*;
pub use frame::*;
pub use pins::*;
pub use spin::*;
