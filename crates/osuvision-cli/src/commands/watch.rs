//! Watch command: a text view of every mirror, reprinted on change.
//!
//! Beatmap metadata is memoized on (screen, map id) so the string reads only
//! happen when the selection or the screen changes.

use std::time::Duration;

use anyhow::Result;
use osuvision::{
    BeatmapSnapshot, Config, GameplaySnapshot, Memo, OsuMode, PlayerSnapshot, ReadMemory, Session,
};
use owo_colors::OwoColorize;

use crate::shutdown::ShutdownSignal;

type BeatmapMemo = Memo<(OsuMode, i32), BeatmapSnapshot>;

pub fn run(config: &Config, interval: Option<u64>) -> Result<()> {
    let session = Session::attach_global(config)?;
    let interval = Duration::from_millis(interval.unwrap_or(config.poll_interval_ms));
    let shutdown = ShutdownSignal::install()?;

    println!("Watching {} (Ctrl+C to stop)", config.process_name);

    let mut beatmap = BeatmapMemo::new();
    let mut last_view = String::new();
    while !shutdown.is_shutdown() {
        let view = frame(session, &mut beatmap);
        if view != last_view {
            let game = session.game_base();
            println!(
                "{} game {} ms | audio {} ms",
                "--".dimmed(),
                game.time().or_default(),
                session.audio_engine().time().or_default()
            );
            println!("{}", view);
            last_view = view;
        }
        if shutdown.wait(interval) {
            break;
        }
    }

    Ok(())
}

/// Read one frame and render it. Clocks are left out so an idle client
/// renders identically from frame to frame.
fn frame<R: ReadMemory>(session: &Session<R>, beatmap: &mut BeatmapMemo) -> String {
    let state = session.game_base().mode().or_default();
    let map_id = session.beatmap().map_id().or_default();
    let map = beatmap.get_or_compute((state, map_id), || BeatmapSnapshot::capture(session));
    let player = PlayerSnapshot::capture(session);
    let gameplay = state
        .is_playing()
        .then(|| GameplaySnapshot::capture(session));

    render(state, &player, map, gameplay.as_ref())
}

fn render(
    state: OsuMode,
    player: &PlayerSnapshot,
    map: &BeatmapSnapshot,
    gameplay: Option<&GameplaySnapshot>,
) -> String {
    let mut lines = vec![
        format!("State:    {}", state),
        format!(
            "Player:   {} | loaded {} | failed {} | retrying {}",
            player.mode, player.loaded, player.failed, player.retrying
        ),
        format!("Beatmap:  {} by {}", map.display_name(), map.creator),
        format!(
            "          map {} / set {} | AR {} CS {} HP {} OD {}",
            map.map_id, map.set_id, map.ar, map.cs, map.hp, map.od
        ),
    ];

    if let Some(play) = gameplay {
        lines.push(format!(
            "Gameplay: {} ({}) +{} | retries {}",
            play.player_name, play.mode, play.mods, play.retries
        ));
        lines.push(format!(
            "          score {} | acc {:.2}% | hp {:.2} | combo {}/{}",
            play.score, play.accuracy, play.hp, play.combo, play.max_combo
        ));
        lines.push(format!(
            "          300 {} | 100 {} | 50 {} | geki {} | katu {} | miss {} | UR {:.2}",
            play.hit300,
            play.hit100,
            play.hit50,
            play.hit_geki,
            play.hit_katu,
            play.hit_miss,
            play.unstable_rate
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use osuvision::memory::layout::{beatmap, signatures};
    use osuvision::memory::{MockMemoryBuilder, MockMemoryReader};
    use osuvision::AddressTable;

    const STATICS: u64 = 0x40_0000;
    const HOLDER: u64 = 0x80_0000;
    const MAP: u64 = 0x90_0000;
    const ARTIST: u64 = 0xA0_0000;

    fn session() -> Session<MockMemoryReader> {
        let mem = MockMemoryBuilder::new()
            .region(STATICS, vec![0u8; 0x100])
            .region(HOLDER, vec![0u8; 0x100])
            .region(MAP, vec![0u8; 0x200])
            .region(ARTIST, vec![0u8; 0x100])
            // [[GameBase::Mode]] = SelectPlay
            .write_pointer(STATICS, HOLDER + 0x10)
            .write_i32(HOLDER + 0x10, OsuMode::SelectPlay as i32)
            // [[Base - 0xC]] = beatmap
            .write_pointer(STATICS + 0x40 - 0xC, HOLDER)
            .write_pointer(HOLDER, MAP)
            .write_i32(MAP + beatmap::MAP_ID, 75)
            .write_dotnet_string(ARTIST, "Kenji Ninuma")
            .write_pointer(MAP + beatmap::ARTIST, ARTIST)
            .build();
        let table = AddressTable::from_entries([
            (signatures::GAME_BASE_MODE, Some(STATICS)),
            (signatures::BASE, Some(STATICS + 0x40)),
        ]);
        Session::new(mem, table)
    }

    #[test]
    fn test_menu_view_has_no_gameplay() {
        let session = session();
        let view = frame(&session, &mut BeatmapMemo::new());
        assert!(view.starts_with("State:    SelectPlay"));
        assert!(view.contains("Kenji Ninuma -  []"));
        assert!(view.contains("map 75 / set 0"));
        assert!(!view.contains("Gameplay:"));
    }

    #[test]
    fn test_beatmap_is_memoized_per_map() {
        let session = session();
        let mut memo = BeatmapMemo::new();
        frame(&session, &mut memo);

        // Same map id: cached metadata is reused
        session.reader().write_dotnet_string(ARTIST, "Someone Else");
        assert!(frame(&session, &mut memo).contains("Kenji Ninuma"));

        // New map id: metadata is read again
        session.reader().write_i32(MAP + beatmap::MAP_ID, 76);
        assert!(frame(&session, &mut memo).contains("Someone Else"));
    }

    #[test]
    fn test_play_view_includes_gameplay() {
        let session = session();
        session
            .reader()
            .write_i32(HOLDER + 0x10, OsuMode::Play as i32);
        let view = frame(&session, &mut BeatmapMemo::new());
        assert!(view.contains("Gameplay:"));
        assert!(view.contains("+NM"));
        assert!(view.contains("UR 0.00"));
    }

    #[test]
    fn test_render_layout() {
        let session = session();
        let player = PlayerSnapshot::capture(&session);
        let map = BeatmapSnapshot::capture(&session);

        let menu = render(OsuMode::SelectPlay, &player, &map, None);
        assert_eq!(menu.lines().count(), 4);
        assert!(!menu.ends_with('\n'));

        let play = GameplaySnapshot::capture(&session);
        let view = render(OsuMode::Play, &player, &map, Some(&play));
        let lines: Vec<_> = view.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "State:    Play");
        assert_eq!(lines[4], "Gameplay:  (osu!) +NM | retries 0");
        assert_eq!(
            lines[6],
            "          300 0 | 100 0 | 50 0 | geki 0 | katu 0 | miss 0 | UR 0.00"
        );
    }
}
