use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Active mod flags, as stored by the client
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u32 {
        const NO_FAIL = 1;
        const EASY = 1 << 1;
        const TOUCH_DEVICE = 1 << 2;
        const HIDDEN = 1 << 3;
        const HARD_ROCK = 1 << 4;
        const SUDDEN_DEATH = 1 << 5;
        const DOUBLE_TIME = 1 << 6;
        const RELAX = 1 << 7;
        const HALF_TIME = 1 << 8;
        /// Always set together with `DOUBLE_TIME`
        const NIGHTCORE = 1 << 9;
        const FLASHLIGHT = 1 << 10;
        const AUTOPLAY = 1 << 11;
        const SPUN_OUT = 1 << 12;
        const AUTOPILOT = 1 << 13;
        /// Always set together with `SUDDEN_DEATH`
        const PERFECT = 1 << 14;
        const KEY4 = 1 << 15;
        const KEY5 = 1 << 16;
        const KEY6 = 1 << 17;
        const KEY7 = 1 << 18;
        const KEY8 = 1 << 19;
        const FADE_IN = 1 << 20;
        const RANDOM = 1 << 21;
        const CINEMA = 1 << 22;
        const TARGET = 1 << 23;
        const KEY9 = 1 << 24;
        const KEY_COOP = 1 << 25;
        const KEY1 = 1 << 26;
        const KEY3 = 1 << 27;
        const KEY2 = 1 << 28;
        const SCORE_V2 = 1 << 29;
        const MIRROR = 1 << 30;
    }
}

impl Mods {
    pub const NONE: Mods = Mods::empty();

    const ACRONYMS: [(Mods, &'static str); 31] = [
        (Self::NO_FAIL, "NF"),
        (Self::EASY, "EZ"),
        (Self::TOUCH_DEVICE, "TD"),
        (Self::HIDDEN, "HD"),
        (Self::HARD_ROCK, "HR"),
        (Self::SUDDEN_DEATH, "SD"),
        (Self::DOUBLE_TIME, "DT"),
        (Self::RELAX, "RX"),
        (Self::HALF_TIME, "HT"),
        (Self::NIGHTCORE, "NC"),
        (Self::FLASHLIGHT, "FL"),
        (Self::AUTOPLAY, "AT"),
        (Self::SPUN_OUT, "SO"),
        (Self::AUTOPILOT, "AP"),
        (Self::PERFECT, "PF"),
        (Self::KEY4, "4K"),
        (Self::KEY5, "5K"),
        (Self::KEY6, "6K"),
        (Self::KEY7, "7K"),
        (Self::KEY8, "8K"),
        (Self::FADE_IN, "FI"),
        (Self::RANDOM, "RD"),
        (Self::CINEMA, "CN"),
        (Self::TARGET, "TP"),
        (Self::KEY9, "9K"),
        (Self::KEY_COOP, "CO"),
        (Self::KEY1, "1K"),
        (Self::KEY3, "3K"),
        (Self::KEY2, "2K"),
        (Self::SCORE_V2, "V2"),
        (Self::MIRROR, "MR"),
    ];

    /// Decode the client's signed mods word; unknown bits are kept
    pub const fn from_raw(value: i32) -> Self {
        Self::from_bits_retain(value as u32)
    }

    /// Playback runs faster than normal (DT or NC)
    pub const fn is_speed_up(self) -> bool {
        self.intersects(Self::DOUBLE_TIME.union(Self::NIGHTCORE))
    }

    pub const fn is_slow_down(self) -> bool {
        self.intersects(Self::HALF_TIME)
    }

    /// Two-letter acronyms of the set flags. Implied flags (DT under NC,
    /// SD under PF) are omitted.
    pub fn acronyms(self) -> Vec<&'static str> {
        Self::ACRONYMS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .filter(|(flag, _)| {
                !(*flag == Self::DOUBLE_TIME && self.contains(Self::NIGHTCORE))
                    && !(*flag == Self::SUDDEN_DEATH && self.contains(Self::PERFECT))
            })
            .map(|(_, acronym)| *acronym)
            .collect()
    }
}

impl Serialize for Mods {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Mods {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_bits_retain)
    }
}

impl fmt::Display for Mods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NM");
        }
        f.write_str(&self.acronyms().concat())
    }
}
