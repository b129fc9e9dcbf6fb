//! Memory layout constants for osu! stable data structures
//!
//! This module centralizes the signature names, pointer chains and field
//! offsets used by the mirrors. The client is a 32-bit .NET process, so
//! every object reference is 4 bytes wide.

/// Signature names as they appear in the descriptor file
pub mod signatures {
    pub const BASE: &str = "Base";
    pub const RULESETS: &str = "Rulesets";
    pub const GAME_BASE_TIME: &str = "GameBase::Time";
    pub const GAME_BASE_MODE: &str = "GameBase::Mode";
    pub const AUDIO_ENGINE_TIME: &str = "AudioEngine::Time";
    pub const PLAYER_FAILED: &str = "Player::Failed";
    pub const PLAYER_RETRYING: &str = "Player::Retrying";
    pub const PLAYER_MODE: &str = "Player::Mode";
    pub const PLAYER_INSTANCE: &str = "Player::Instance";
}

/// .NET object layout (32-bit CLR)
pub mod dotnet {
    /// `System.String`: element count after the method table pointer
    pub const STRING_LENGTH: u64 = 0x4;
    /// `System.String`: first UTF-16 code unit
    pub const STRING_CHARS: u64 = 0x8;

    /// `List<T>`: reference to the backing array
    pub const LIST_ITEMS: u64 = 0x4;
    /// `List<T>`: number of live elements
    pub const LIST_SIZE: u64 = 0xC;

    /// `T[]`: first element, after method table and length
    pub const ARRAY_DATA: u64 = 0x8;
}

/// A static whose value is a reference to the field itself: `[[sig]]`
pub const STATIC_REF: &[i64] = &[0];

/// Beatmap object, reached through `[[Base - 0xC]]`
pub mod beatmap {
    pub const CHAIN: &[i64] = &[-0xC, 0];

    pub const ARTIST: u64 = 0x18;
    pub const ARTIST_ORIGINAL: u64 = 0x1C;
    pub const TITLE: u64 = 0x24;
    pub const TITLE_ORIGINAL: u64 = 0x28;
    pub const AR: u64 = 0x2C;
    pub const CS: u64 = 0x30;
    pub const HP: u64 = 0x34;
    pub const OD: u64 = 0x38;
    pub const AUDIO_FILENAME: u64 = 0x64;
    pub const BG_FILENAME: u64 = 0x68;
    pub const CHECKSUM: u64 = 0x6C;
    pub const FOLDER: u64 = 0x78;
    pub const CREATOR: u64 = 0x7C;
    pub const FILENAME: u64 = 0x90;
    pub const DIFFICULTY: u64 = 0xAC;
    pub const MAP_ID: u64 = 0xC8;
    pub const SET_ID: u64 = 0xCC;
    pub const OBJECT_COUNT: u64 = 0xF8;
    pub const RANKED_STATUS: u64 = 0x12C;
}

/// Player instance fields
pub mod player {
    /// Loaded flag on the object at `[Player::Instance]`
    pub const LOADED: u64 = 0x188;
}

/// Live gameplay objects hanging off the ruleset
///
/// ```text
/// [[Rulesets - 0xB] + 0x4]          Ruleset
///            └─ + 0x68              Gameplay
///                  ├─ + 0x38        Score
///                  ├─ + 0x40        HP bar
///                  └─ + 0x48        Accuracy display
/// ```
pub mod gameplay {
    pub const RULESET_CHAIN: &[i64] = &[-0xB, 0x4];
    pub const GAMEPLAY_CHAIN: &[i64] = &[-0xB, 0x4, 0x68];
    pub const SCORE_CHAIN: &[i64] = &[-0xB, 0x4, 0x68, 0x38];
    pub const HP_BAR_CHAIN: &[i64] = &[-0xB, 0x4, 0x68, 0x40];
    /// From the `Base` signature
    pub const RETRIES_CHAIN: &[i64] = &[-0x33, 0];

    // Ruleset
    pub const SCORE: u64 = 0x100;

    // Gameplay
    pub const ACCURACY_DISPLAY: u64 = 0x48;
    /// f64 on the accuracy display object
    pub const ACCURACY_VALUE: u64 = 0xC;

    // HP bar
    pub const HP_SMOOTH: u64 = 0x14;
    pub const HP: u64 = 0x1C;

    // Retries holder
    pub const RETRIES: u64 = 0x8;

    // Score
    pub const PLAYER_NAME: u64 = 0x28;
    pub const HIT_ERRORS: u64 = 0x38;
    pub const MODS: u64 = 0x1C;
    pub const MODE: u64 = 0x64;
    pub const MAX_COMBO: u64 = 0x68;
    pub const HIT_100: u64 = 0x88;
    pub const HIT_300: u64 = 0x8A;
    pub const HIT_50: u64 = 0x8C;
    pub const HIT_GEKI: u64 = 0x8E;
    pub const HIT_KATU: u64 = 0x90;
    pub const HIT_MISS: u64 = 0x92;
    pub const COMBO: u64 = 0x94;

    // Obfuscated mods pair, XOR-ed together
    pub const MODS_XOR_A: u64 = 0xC;
    pub const MODS_XOR_B: u64 = 0x8;

    /// Upper bound on hit error entries read in one call
    pub const MAX_HIT_ERRORS: usize = 0x10000;
}
