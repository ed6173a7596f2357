//! Song catalog: the track records read from `music-list.json` and the
//! loader that fetches them once at startup.

mod load;
mod model;

pub use load::*;
pub use model::*;
