//! Read-only typed views over the target's state.
//!
//! Every property walks its pointer chain and performs its read on each
//! call, returning a [`Readout`](crate::memory::Readout).

mod audio_engine;
mod beatmap;
mod game_base;
mod gameplay;
mod memo;
mod player;
mod snapshot;

pub use audio_engine::AudioEngine;
pub use beatmap::Beatmap;
pub use game_base::GameBase;
pub use gameplay::GamePlay;
pub use memo::Memo;
pub use player::Player;
pub use snapshot::*;
