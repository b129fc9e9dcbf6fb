use crate::game::{self, GameMode, Mods};
use crate::memory::layout::{dotnet, gameplay, signatures};
use crate::memory::{ReadMemory, Readout, field_address};
use crate::offset::MIN_VALID_ADDRESS;
use crate::session::Session;

/// Live counters of the play in progress.
///
/// Only meaningful while the client is on the play screen; elsewhere the
/// chains usually fail and every property is `Unavailable`.
pub struct GamePlay<'a, R: ReadMemory> {
    session: &'a Session<R>,
}

impl<'a, R: ReadMemory> GamePlay<'a, R> {
    pub fn new(session: &'a Session<R>) -> Self {
        Self { session }
    }

    pub fn ruleset(&self) -> Readout<u64> {
        self.session
            .resolve_chain(signatures::RULESETS, gameplay::RULESET_CHAIN)
    }

    fn gameplay(&self) -> Readout<u64> {
        self.session
            .resolve_chain(signatures::RULESETS, gameplay::GAMEPLAY_CHAIN)
    }

    fn score_object(&self) -> Readout<u64> {
        self.session
            .resolve_chain(signatures::RULESETS, gameplay::SCORE_CHAIN)
    }

    fn hp_bar(&self) -> Readout<u64> {
        self.session
            .resolve_chain(signatures::RULESETS, gameplay::HP_BAR_CHAIN)
    }

    /// Object reference stored at `object + offset`, rejected when null
    fn deref(&self, object: u64, offset: u64) -> Readout<u64> {
        field_address(object, offset)
            .and_then(|field| self.session.read().read_pointer(field))
            .filter(|&ptr| ptr > MIN_VALID_ADDRESS)
    }

    fn i32_at(&self, object: Readout<u64>, offset: u64) -> Readout<i32> {
        object
            .and_then(|obj| field_address(obj, offset))
            .and_then(|address| self.session.read().read_i32(address))
    }

    fn f64_at(&self, object: Readout<u64>, offset: u64) -> Readout<f64> {
        object
            .and_then(|obj| field_address(obj, offset))
            .and_then(|address| self.session.read().read_f64(address))
    }

    fn counter(&self, offset: u64) -> Readout<i16> {
        self.score_object()
            .and_then(|score| field_address(score, offset))
            .and_then(|address| self.session.read().read_i16(address))
    }

    /// Retries of the current map in this session
    pub fn retries(&self) -> Readout<i32> {
        self.i32_at(
            self.session
                .resolve_chain(signatures::BASE, gameplay::RETRIES_CHAIN),
            gameplay::RETRIES,
        )
    }

    pub fn score(&self) -> Readout<i32> {
        self.i32_at(self.ruleset(), gameplay::SCORE)
    }

    pub fn hp(&self) -> Readout<f64> {
        self.f64_at(self.hp_bar(), gameplay::HP)
    }

    /// HP as drawn, eased towards `hp`
    pub fn hp_smooth(&self) -> Readout<f64> {
        self.f64_at(self.hp_bar(), gameplay::HP_SMOOTH)
    }

    /// Accuracy in percent
    pub fn accuracy(&self) -> Readout<f64> {
        let display = self
            .gameplay()
            .and_then(|gp| self.deref(gp, gameplay::ACCURACY_DISPLAY));
        self.f64_at(display, gameplay::ACCURACY_VALUE)
    }

    /// Stored as two words that must be XOR-ed together
    pub fn mods(&self) -> Readout<Mods> {
        let pair = self
            .score_object()
            .and_then(|score| self.deref(score, gameplay::MODS));
        self.i32_at(pair, gameplay::MODS_XOR_A)
            .and_then(|a| self.i32_at(pair, gameplay::MODS_XOR_B).map(|b| a ^ b))
            .map(Mods::from_raw)
    }

    pub fn mode(&self) -> Readout<GameMode> {
        self.i32_at(self.score_object(), gameplay::MODE)
            .and_then(|raw| GameMode::from_i32(raw).into())
    }

    pub fn player_name(&self) -> Readout<String> {
        self.score_object()
            .and_then(|score| field_address(score, gameplay::PLAYER_NAME))
            .and_then(|field| self.session.read().read_string_field(field))
    }

    pub fn hit300(&self) -> Readout<i16> {
        self.counter(gameplay::HIT_300)
    }

    pub fn hit100(&self) -> Readout<i16> {
        self.counter(gameplay::HIT_100)
    }

    pub fn hit50(&self) -> Readout<i16> {
        self.counter(gameplay::HIT_50)
    }

    pub fn hit_geki(&self) -> Readout<i16> {
        self.counter(gameplay::HIT_GEKI)
    }

    pub fn hit_katu(&self) -> Readout<i16> {
        self.counter(gameplay::HIT_KATU)
    }

    pub fn hit_miss(&self) -> Readout<i16> {
        self.counter(gameplay::HIT_MISS)
    }

    pub fn combo(&self) -> Readout<i16> {
        self.counter(gameplay::COMBO)
    }

    pub fn max_combo(&self) -> Readout<i16> {
        self.counter(gameplay::MAX_COMBO)
    }

    /// Signed timing offset (ms) of every judged hit so far.
    ///
    /// Backed by a `List<int>`: the element count is read first, then that
    /// many consecutive values from the backing array.
    pub fn hit_errors(&self) -> Readout<Vec<i32>> {
        if !self.ruleset().is_available() || !self.gameplay().is_available() {
            return Readout::Unavailable;
        }

        let list = self
            .score_object()
            .and_then(|score| self.deref(score, gameplay::HIT_ERRORS));
        let size = self.i32_at(list, dotnet::LIST_SIZE);
        let data = list
            .and_then(|list| self.deref(list, dotnet::LIST_ITEMS))
            .and_then(|items| field_address(items, dotnet::ARRAY_DATA));

        size.and_then(|size| match usize::try_from(size) {
            Err(_) | Ok(0) => Readout::Value(Vec::new()),
            Ok(n) if n > gameplay::MAX_HIT_ERRORS => Readout::Unavailable,
            Ok(n) => data.and_then(|data| self.session.read().read_i32_array(data, n)),
        })
    }

    /// Unstable rate of the current play, corrected for DT/NC and HT
    pub fn unstable_rate(&self) -> Readout<f64> {
        let mods = self.mods().or_default();
        self.hit_errors()
            .map(|errors| game::unstable_rate(&errors, mods))
    }
}
