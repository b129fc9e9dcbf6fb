use crate::game::GameMode;
use crate::memory::layout::{STATIC_REF, player, signatures};
use crate::memory::{ReadMemory, Readout, field_address};
use crate::session::Session;

/// Session flags of the local player
pub struct Player<'a, R: ReadMemory> {
    session: &'a Session<R>,
}

impl<'a, R: ReadMemory> Player<'a, R> {
    pub fn new(session: &'a Session<R>) -> Self {
        Self { session }
    }

    pub fn failed(&self) -> Readout<bool> {
        self.session.static_bool(signatures::PLAYER_FAILED)
    }

    pub fn retrying(&self) -> Readout<bool> {
        self.session.static_bool(signatures::PLAYER_RETRYING)
    }

    /// Ruleset selected by the player
    pub fn mode(&self) -> Readout<GameMode> {
        self.session
            .static_i32(signatures::PLAYER_MODE)
            .and_then(|raw| GameMode::from_i32(raw).into())
    }

    /// Whether the play screen has finished loading
    pub fn loaded(&self) -> Readout<bool> {
        self.session
            .resolve_chain(signatures::PLAYER_INSTANCE, STATIC_REF)
            .and_then(|instance| field_address(instance, player::LOADED))
            .and_then(|address| self.session.read().read_bool(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MockMemoryBuilder, MockMemoryReader};
    use crate::offset::AddressTable;

    const STATICS: u64 = 0x40_0000;
    const HEAP: u64 = 0x90_0000;

    fn session() -> Session<MockMemoryReader> {
        let mem = MockMemoryBuilder::new()
            .region(STATICS, vec![0u8; 0x100])
            .region(HEAP, vec![0u8; 0x400])
            .write_pointer(STATICS, HEAP)
            .write_pointer(STATICS + 0x4, HEAP + 0x4)
            .write_pointer(STATICS + 0x8, HEAP + 0x8)
            .write_pointer(STATICS + 0xC, HEAP + 0x100)
            .write_u8(HEAP, 1)
            .write_u8(HEAP + 0x4, 0)
            .write_i32(HEAP + 0x8, 3)
            .write_u8(HEAP + 0x100 + player::LOADED, 1)
            .build();
        let table = AddressTable::from_entries([
            (signatures::PLAYER_FAILED, Some(STATICS)),
            (signatures::PLAYER_RETRYING, Some(STATICS + 0x4)),
            (signatures::PLAYER_MODE, Some(STATICS + 0x8)),
            (signatures::PLAYER_INSTANCE, Some(STATICS + 0xC)),
        ]);
        Session::new(mem, table)
    }

    #[test]
    fn test_player_flags() {
        let session = session();
        let player = session.player();
        assert_eq!(player.failed(), Readout::Value(true));
        assert_eq!(player.retrying(), Readout::Value(false));
        assert_eq!(player.mode(), Readout::Value(GameMode::Mania));
        assert_eq!(player.loaded(), Readout::Value(true));
    }

    #[test]
    fn test_null_instance_is_not_loaded() {
        let session = session();
        session.reader().write_pointer(STATICS + 0xC, 0);
        assert_eq!(session.player().loaded(), Readout::Unavailable);
        assert!(!session.player().loaded().or_default());
    }
}
