use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

/// Screen the client is currently showing
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(i32)]
pub enum OsuMode {
    #[default]
    Menu = 0,
    Edit = 1,
    Play = 2,
    Exit = 3,
    SelectEdit = 4,
    SelectPlay = 5,
    SelectDrawings = 6,
    Rank = 7,
    Update = 8,
    Busy = 9,
    Unknown = 10,
    Lobby = 11,
    MatchSetup = 12,
    SelectMulti = 13,
    RankingVs = 14,
    OnlineSelection = 15,
    OptionsOffsetWizard = 16,
    RankingTagCoop = 17,
    RankingTeam = 18,
    BeatmapImport = 19,
    PackageUpdater = 20,
    Benchmark = 21,
    Tourney = 22,
    Charts = 23,
}

impl OsuMode {
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Play)
    }

    pub fn is_song_select(&self) -> bool {
        matches!(self, Self::SelectPlay | Self::SelectEdit | Self::SelectMulti)
    }
}

/// Ruleset of a play or beatmap
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(i32)]
pub enum GameMode {
    #[default]
    #[strum(serialize = "osu!")]
    Standard = 0,
    #[strum(serialize = "osu!taiko")]
    Taiko = 1,
    #[strum(serialize = "osu!catch")]
    Catch = 2,
    #[strum(serialize = "osu!mania")]
    Mania = 3,
}

impl GameMode {
    pub fn from_i32(value: i32) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_osu_mode_from_i32() {
        assert_eq!(OsuMode::from_i32(0), Some(OsuMode::Menu));
        assert_eq!(OsuMode::from_i32(2), Some(OsuMode::Play));
        assert_eq!(OsuMode::from_i32(5), Some(OsuMode::SelectPlay));
        assert_eq!(OsuMode::from_i32(23), Some(OsuMode::Charts));
        assert_eq!(OsuMode::from_i32(24), None);
        assert_eq!(OsuMode::from_i32(-1), None);
    }

    #[test]
    fn test_osu_mode_helpers() {
        assert!(OsuMode::Play.is_playing());
        assert!(!OsuMode::Rank.is_playing());
        assert!(OsuMode::SelectPlay.is_song_select());
        assert_eq!(OsuMode::from_str("SelectPlay").unwrap(), OsuMode::SelectPlay);
    }

    #[test]
    fn test_game_mode() {
        assert_eq!(GameMode::from_i32(1), Some(GameMode::Taiko));
        assert_eq!(GameMode::from_i32(4), None);
        assert_eq!(GameMode::Mania.to_string(), "osu!mania");
        assert_eq!(GameMode::Standard.short_name(), "osu!");
        assert_eq!(GameMode::default(), GameMode::Standard);
    }
}
