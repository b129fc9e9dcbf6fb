use crate::memory::layout::signatures;
use crate::memory::{ReadMemory, Readout};
use crate::session::Session;

/// Audio playback position
pub struct AudioEngine<'a, R: ReadMemory> {
    session: &'a Session<R>,
}

impl<'a, R: ReadMemory> AudioEngine<'a, R> {
    pub fn new(session: &'a Session<R>) -> Self {
        Self { session }
    }

    /// Position of the current track in milliseconds
    pub fn time(&self) -> Readout<i32> {
        self.session.static_i32(signatures::AUDIO_ENGINE_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;
    use crate::offset::AddressTable;

    #[test]
    fn test_time_is_reread_each_call() {
        let mem = MockMemoryBuilder::new()
            .region(0x40_0000, vec![0u8; 0x100])
            .region(0x90_0000, vec![0u8; 0x100])
            .write_pointer(0x40_0040, 0x90_0000)
            .write_i32(0x90_0000, 1000)
            .build();
        let table = AddressTable::from_entries([(signatures::AUDIO_ENGINE_TIME, Some(0x40_0040))]);
        let session = Session::new(mem, table);

        assert_eq!(session.audio_engine().time(), Readout::Value(1000));
        session.reader().write_i32(0x90_0000, 1016);
        assert_eq!(session.audio_engine().time(), Readout::Value(1016));
    }
}
