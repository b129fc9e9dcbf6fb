use crate::game::OsuMode;
use crate::memory::layout::signatures;
use crate::memory::{ReadMemory, Readout};
use crate::session::Session;

/// Global client clock and current screen
pub struct GameBase<'a, R: ReadMemory> {
    session: &'a Session<R>,
}

impl<'a, R: ReadMemory> GameBase<'a, R> {
    pub fn new(session: &'a Session<R>) -> Self {
        Self { session }
    }

    /// Client clock in milliseconds
    pub fn time(&self) -> Readout<i32> {
        self.session.static_i32(signatures::GAME_BASE_TIME)
    }

    pub fn mode(&self) -> Readout<OsuMode> {
        self.session
            .static_i32(signatures::GAME_BASE_MODE)
            .and_then(|raw| OsuMode::from_i32(raw).into())
    }
}
