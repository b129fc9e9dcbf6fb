//! One-pass capture of every mirror.
//!
//! Individual properties are read microseconds apart and may straddle a
//! frame; a snapshot at least reads them all back to back and records when.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::{GameMode, Mods, OsuMode};
use crate::memory::ReadMemory;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub captured_at: DateTime<Utc>,
    pub state: OsuMode,
    pub game_time: i32,
    pub audio_time: i32,
    pub player: PlayerSnapshot,
    pub beatmap: BeatmapSnapshot,
    /// Present only while the client is on the play screen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gameplay: Option<GameplaySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub mode: GameMode,
    pub loaded: bool,
    pub failed: bool,
    pub retrying: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatmapSnapshot {
    pub artist: String,
    pub artist_original: String,
    pub title: String,
    pub title_original: String,
    pub difficulty: String,
    pub creator: String,
    pub checksum: String,
    pub folder: String,
    pub filename: String,
    pub audio_filename: String,
    pub bg_filename: String,
    pub map_id: i32,
    pub set_id: i32,
    pub ar: f32,
    pub cs: f32,
    pub hp: f32,
    pub od: f32,
    pub object_count: i32,
    pub ranked_status: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameplaySnapshot {
    pub mode: GameMode,
    pub player_name: String,
    pub mods: Mods,
    pub score: i32,
    pub hp: f64,
    pub hp_smooth: f64,
    pub accuracy: f64,
    pub hit300: i16,
    pub hit100: i16,
    pub hit50: i16,
    pub hit_geki: i16,
    pub hit_katu: i16,
    pub hit_miss: i16,
    pub combo: i16,
    pub max_combo: i16,
    pub retries: i32,
    pub unstable_rate: f64,
}

impl GameSnapshot {
    pub fn capture<R: ReadMemory>(session: &Session<R>) -> Self {
        let game = session.game_base();
        let state = game.mode().or_default();

        Self {
            captured_at: Utc::now(),
            state,
            game_time: game.time().or_default(),
            audio_time: session.audio_engine().time().or_default(),
            player: PlayerSnapshot::capture(session),
            beatmap: BeatmapSnapshot::capture(session),
            gameplay: state
                .is_playing()
                .then(|| GameplaySnapshot::capture(session)),
        }
    }
}

impl PlayerSnapshot {
    pub fn capture<R: ReadMemory>(session: &Session<R>) -> Self {
        let player = session.player();
        Self {
            mode: player.mode().or_default(),
            loaded: player.loaded().or_default(),
            failed: player.failed().or_default(),
            retrying: player.retrying().or_default(),
        }
    }
}

impl BeatmapSnapshot {
    pub fn capture<R: ReadMemory>(session: &Session<R>) -> Self {
        let map = session.beatmap();
        Self {
            artist: map.artist().or_default(),
            artist_original: map.artist_original().or_default(),
            title: map.title().or_default(),
            title_original: map.title_original().or_default(),
            difficulty: map.difficulty().or_default(),
            creator: map.creator().or_default(),
            checksum: map.checksum().or_default(),
            folder: map.folder().or_default(),
            filename: map.filename().or_default(),
            audio_filename: map.audio_filename().or_default(),
            bg_filename: map.bg_filename().or_default(),
            map_id: map.map_id().or_default(),
            set_id: map.set_id().or_default(),
            ar: map.ar().or_default(),
            cs: map.cs().or_default(),
            hp: map.hp().or_default(),
            od: map.od().or_default(),
            object_count: map.object_count().or_default(),
            ranked_status: map.ranked_status().or_default(),
        }
    }

    /// "Artist - Title [Difficulty]"
    pub fn display_name(&self) -> String {
        format!("{} - {} [{}]", self.artist, self.title, self.difficulty)
    }
}

impl GameplaySnapshot {
    pub fn capture<R: ReadMemory>(session: &Session<R>) -> Self {
        let play = session.gameplay();
        let mods = play.mods().or_default();
        let hit_errors = play.hit_errors().or_default();

        Self {
            mode: play.mode().or_default(),
            player_name: play.player_name().or_default(),
            mods,
            score: play.score().or_default(),
            hp: play.hp().or_default(),
            hp_smooth: play.hp_smooth().or_default(),
            accuracy: play.accuracy().or_default(),
            hit300: play.hit300().or_default(),
            hit100: play.hit100().or_default(),
            hit50: play.hit50().or_default(),
            hit_geki: play.hit_geki().or_default(),
            hit_katu: play.hit_katu().or_default(),
            hit_miss: play.hit_miss().or_default(),
            combo: play.combo().or_default(),
            max_combo: play.max_combo().or_default(),
            retries: play.retries().or_default(),
            unstable_rate: crate::game::unstable_rate(&hit_errors, mods),
        }
    }
}
