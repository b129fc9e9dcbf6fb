use std::path::{Path, PathBuf};

use crate::memory::layout::{beatmap, signatures};
use crate::memory::{ReadMemory, Readout, field_address};
use crate::session::Session;

/// The currently selected beatmap
pub struct Beatmap<'a, R: ReadMemory> {
    session: &'a Session<R>,
}

impl<'a, R: ReadMemory> Beatmap<'a, R> {
    pub fn new(session: &'a Session<R>) -> Self {
        Self { session }
    }

    /// Address of the beatmap object, walked fresh on every call
    pub fn object(&self) -> Readout<u64> {
        self.session.resolve_chain(signatures::BASE, beatmap::CHAIN)
    }

    fn field(&self, offset: u64) -> Readout<u64> {
        self.object().and_then(|obj| field_address(obj, offset))
    }

    fn string(&self, offset: u64) -> Readout<String> {
        self.field(offset)
            .and_then(|address| self.session.read().read_string_field(address))
    }

    fn float(&self, offset: u64) -> Readout<f32> {
        self.field(offset)
            .and_then(|address| self.session.read().read_f32(address))
    }

    fn int(&self, offset: u64) -> Readout<i32> {
        self.field(offset)
            .and_then(|address| self.session.read().read_i32(address))
    }

    pub fn artist(&self) -> Readout<String> {
        self.string(beatmap::ARTIST)
    }

    /// Artist in the original (unromanized) script
    pub fn artist_original(&self) -> Readout<String> {
        self.string(beatmap::ARTIST_ORIGINAL)
    }

    pub fn title(&self) -> Readout<String> {
        self.string(beatmap::TITLE)
    }

    pub fn title_original(&self) -> Readout<String> {
        self.string(beatmap::TITLE_ORIGINAL)
    }

    pub fn difficulty(&self) -> Readout<String> {
        self.string(beatmap::DIFFICULTY)
    }

    pub fn creator(&self) -> Readout<String> {
        self.string(beatmap::CREATOR)
    }

    /// MD5 of the .osu file
    pub fn checksum(&self) -> Readout<String> {
        self.string(beatmap::CHECKSUM)
    }

    pub fn folder(&self) -> Readout<String> {
        self.string(beatmap::FOLDER)
    }

    pub fn filename(&self) -> Readout<String> {
        self.string(beatmap::FILENAME)
    }

    pub fn audio_filename(&self) -> Readout<String> {
        self.string(beatmap::AUDIO_FILENAME)
    }

    pub fn bg_filename(&self) -> Readout<String> {
        self.string(beatmap::BG_FILENAME)
    }

    pub fn ar(&self) -> Readout<f32> {
        self.float(beatmap::AR)
    }

    pub fn cs(&self) -> Readout<f32> {
        self.float(beatmap::CS)
    }

    pub fn hp(&self) -> Readout<f32> {
        self.float(beatmap::HP)
    }

    pub fn od(&self) -> Readout<f32> {
        self.float(beatmap::OD)
    }

    pub fn map_id(&self) -> Readout<i32> {
        self.int(beatmap::MAP_ID)
    }

    pub fn set_id(&self) -> Readout<i32> {
        self.int(beatmap::SET_ID)
    }

    pub fn object_count(&self) -> Readout<i32> {
        self.int(beatmap::OBJECT_COUNT)
    }

    pub fn ranked_status(&self) -> Readout<i32> {
        self.int(beatmap::RANKED_STATUS)
    }

    /// Location of the .osu file under the client's Songs directory
    pub fn path(&self, songs_dir: &Path) -> Readout<PathBuf> {
        self.folder()
            .and_then(|folder| self.filename().map(|file| songs_dir.join(folder).join(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MockMemoryBuilder, MockMemoryReader, PointerWidth};
    use crate::offset::AddressTable;

    const BASE_SIG: u64 = 0x40_0100;
    const HOLDER: u64 = 0x80_0000;
    const MAP: u64 = 0x90_0000;
    const STRINGS: u64 = 0xA0_0000;

    fn with_string(
        builder: MockMemoryBuilder,
        field: u64,
        slot: u64,
        value: &str,
    ) -> MockMemoryBuilder {
        let object = STRINGS + slot * 0x100;
        builder
            .write_dotnet_string(object, value)
            .write_pointer(MAP + field, object)
    }

    fn session() -> Session<MockMemoryReader> {
        let mut builder = MockMemoryBuilder::new()
            .region(0x40_0000, vec![0u8; 0x200])
            .region(HOLDER, vec![0u8; 0x10])
            .region(MAP, vec![0u8; 0x200])
            .region(STRINGS, vec![0u8; 0x1000])
            .write_pointer(BASE_SIG - 0xC, HOLDER)
            .write_pointer(HOLDER, MAP)
            .write_f32(MAP + beatmap::AR, 9.3)
            .write_f32(MAP + beatmap::CS, 4.0)
            .write_f32(MAP + beatmap::HP, 5.5)
            .write_f32(MAP + beatmap::OD, 8.8)
            .write_i32(MAP + beatmap::MAP_ID, 2_116_202)
            .write_i32(MAP + beatmap::SET_ID, 1_013_405)
            .write_i32(MAP + beatmap::OBJECT_COUNT, 1502)
            .write_i32(MAP + beatmap::RANKED_STATUS, 4);

        for (slot, (field, value)) in [
            (beatmap::ARTIST, "Camellia"),
            (beatmap::TITLE, "Exit This Earth's Atomosphere"),
            (beatmap::DIFFICULTY, "Evolution"),
            (beatmap::CREATOR, "Mir"),
            (beatmap::FOLDER, "1013405 Camellia - Exit This Earth's Atomosphere"),
            (beatmap::FILENAME, "Camellia - Exit (Mir) [Evolution].osu"),
            (beatmap::CHECKSUM, "0123456789abcdef0123456789abcdef"),
        ]
        .into_iter()
        .enumerate()
        {
            builder = with_string(builder, field, slot as u64, value);
        }

        let table = AddressTable::from_entries([(signatures::BASE, Some(BASE_SIG))]);
        Session::new(builder.build(), table)
    }

    #[test]
    fn test_metadata() {
        let session = session();
        let map = session.beatmap();
        assert_eq!(map.artist().or_default(), "Camellia");
        assert_eq!(map.difficulty().or_default(), "Evolution");
        assert_eq!(map.creator().or_default(), "Mir");
        assert_eq!(map.checksum().or_default().len(), 32);
        assert_eq!(map.map_id(), Readout::Value(2_116_202));
        assert_eq!(map.set_id(), Readout::Value(1_013_405));
        assert_eq!(map.object_count(), Readout::Value(1502));
        assert_eq!(map.ranked_status(), Readout::Value(4));
        assert_eq!(map.ar(), Readout::Value(9.3));
        assert_eq!(map.od(), Readout::Value(8.8));
    }

    #[test]
    fn test_unset_string_field_is_empty() {
        let session = session();
        assert_eq!(session.beatmap().title_original(), Readout::Unavailable);
        assert_eq!(session.beatmap().bg_filename().or_default(), "");
    }

    #[test]
    fn test_path() {
        let session = session();
        let path = session.beatmap().path(Path::new("Songs")).or_default();
        assert_eq!(
            path,
            Path::new("Songs")
                .join("1013405 Camellia - Exit This Earth's Atomosphere")
                .join("Camellia - Exit (Mir) [Evolution].osu")
        );
    }

    #[test]
    fn test_overflowing_object_fails_closed() {
        let mem = MockMemoryBuilder::new()
            .pointer_width(PointerWidth::Bits64)
            .region(0x40_0000, vec![0u8; 0x200])
            .region(HOLDER, vec![0u8; 0x10])
            .write_pointer(BASE_SIG - 0xC, HOLDER)
            .write_pointer(HOLDER, u64::MAX - 0x10)
            .build();
        let table = AddressTable::from_entries([(signatures::BASE, Some(BASE_SIG))]);
        let session = Session::new(mem, table);
        let map = session.beatmap();

        assert_eq!(map.object(), Readout::Value(u64::MAX - 0x10));
        assert_eq!(map.map_id(), Readout::Unavailable);
        assert_eq!(map.map_id().or_default(), 0);
        assert_eq!(map.ar().or_default(), 0.0);
        assert_eq!(map.artist().or_default(), "");
    }

    #[test]
    fn test_map_switch_is_seen_on_next_read() {
        let session = session();
        assert_eq!(session.beatmap().map_id(), Readout::Value(2_116_202));

        // Client swaps the selected map object
        session.reader().write_pointer(HOLDER, 0);
        assert_eq!(session.beatmap().object(), Readout::Unavailable);
        assert_eq!(session.beatmap().map_id().or_default(), 0);
        assert_eq!(session.beatmap().artist().or_default(), "");
    }
}
