pub mod analysis;
pub mod clustering;
pub mod color;
pub mod detection;
pub mod model;
pub mod sampling;

pub use analysis::*;
pub use clustering::*;
pub use color::*;
pub use detection::*;
pub use model::*;
pub use sampling::*;
