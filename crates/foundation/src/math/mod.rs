pub mod mat4;
pub mod spherical;
pub mod vec;

pub use mat4::*;
pub use spherical::*;
pub use vec::*;
