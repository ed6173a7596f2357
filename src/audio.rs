//! Audio engine: a dedicated thread owning the output stream and the single
//! sink, driven by `AudioCmd`s and reporting `AudioEvent`s back.

mod media;
mod player;
mod tap;
mod thread;
mod types;

pub use media::AudioError;
pub use player::AudioPlayer;
pub use tap::{AnalysisTap, TappedSource};
pub use types::*;

#[cfg(test)]
mod tests;
