//! Application module: the player model and its message dispatcher.
//!
//! `App` lives in `app::model` and owns the catalog, the filter inputs, the
//! filtered view and the transport. The runtime feeds it `Msg`s and executes
//! the returned `Command`s.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
