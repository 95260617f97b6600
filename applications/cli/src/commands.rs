//! Command bodies, kept free of printing so they can be tested

use crate::simulate::SimulatedOutput;
use cadence_core::{catalog, format::format_duration_ms, Song};
use cadence_playback::{seed, EngineConfig, PlaybackEngine, PlaybackEvent};
use cadence_spotify::{albums::DEFAULT_GENRES, featured_albums, AlbumDigest, Track, TrackSource};
use std::time::Duration;
use tracing::{info, warn};

/// One search result line: `artist - name (m:ss)` plus a marker for
/// tracks that cannot be played
pub fn describe_track(track: &Track) -> String {
    let length = track
        .duration_ms
        .map(format_duration_ms)
        .unwrap_or_else(|| "-:--".to_string());
    let marker = if track.has_preview() { "" } else { " [no preview]" };
    format!(
        "{} - {} ({}){}",
        track.primary_artist().unwrap_or("Unknown Artist"),
        track.name,
        length,
        marker
    )
}

pub async fn search<S>(source: &S, query: &str) -> cadence_spotify::Result<Vec<Track>>
where
    S: TrackSource + ?Sized,
{
    info!(query, "Searching tracks");
    source.search_tracks(query).await
}

/// The playlist the engine would start with
///
/// Mirrors engine initialization: source songs when there are any, the
/// fallback catalog otherwise.
pub async fn resolve_playlist<S>(
    source: Option<&S>,
    config: &EngineConfig,
    fallback: Option<Vec<Song>>,
) -> Vec<Song>
where
    S: TrackSource + ?Sized,
{
    if let Some(source) = source {
        match seed::fetch_songs(source, config).await {
            Ok(songs) => return songs,
            Err(e) => warn!(error = %e, "Falling back to local catalog"),
        }
    }
    fallback.unwrap_or_else(catalog::default_catalog)
}

pub async fn albums<S>(source: &S) -> AlbumDigest
where
    S: TrackSource + ?Sized,
{
    featured_albums(source, DEFAULT_GENRES).await
}

/// Outcome of a dry run
#[derive(Debug, Default)]
pub struct SimulationReport {
    pub events: Vec<PlaybackEvent>,
    pub songs_finished: usize,
}

/// Play `engine` for `total` of virtual time in `step` increments
///
/// Starts playback first. `on_event` sees every event as it is drained.
pub fn run_simulation(
    engine: &mut PlaybackEngine<SimulatedOutput>,
    total: Duration,
    step: Duration,
    mut on_event: impl FnMut(&PlaybackEvent),
) -> SimulationReport {
    let mut report = SimulationReport::default();
    let step = if step.is_zero() {
        Duration::from_millis(100)
    } else {
        step
    };

    engine.process_events();
    engine.play_pause();

    let mut now = Duration::ZERO;
    while now < total {
        engine.process_events();
        collect(engine, &mut report, &mut on_event);

        now += step;
        engine.tick(now);
        engine.output_mut().advance(step);
    }
    engine.process_events();
    collect(engine, &mut report, &mut on_event);

    report
}

fn collect(
    engine: &mut PlaybackEngine<SimulatedOutput>,
    report: &mut SimulationReport,
    on_event: &mut impl FnMut(&PlaybackEvent),
) {
    for event in engine.drain_events() {
        if matches!(event, PlaybackEvent::SongFinished { .. }) {
            report.songs_finished += 1;
        }
        on_event(&event);
        report.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_spotify::{Album, Artist};

    fn track(preview: Option<&str>, duration_ms: Option<u64>) -> Track {
        Track {
            id: "1".to_string(),
            name: "Calle Ocho".to_string(),
            artists: vec![Artist {
                name: "Pitbull".to_string(),
            }],
            preview_url: preview.map(str::to_string),
            album: Album::default(),
            duration_ms,
        }
    }

    #[test]
    fn describes_playable_track() {
        let line = describe_track(&track(Some("https://p.example/1"), Some(237_000)));
        assert_eq!(line, "Pitbull - Calle Ocho (3:57)");
    }

    #[test]
    fn marks_track_without_preview() {
        let line = describe_track(&track(None, None));
        assert_eq!(line, "Pitbull - Calle Ocho (-:--) [no preview]");
    }

    #[test]
    fn simulation_walks_the_playlist() {
        let output = SimulatedOutput::new(Duration::from_secs(2));
        let config = EngineConfig {
            end_of_track_delay_ms: 0,
            ..EngineConfig::default()
        };
        let mut engine = PlaybackEngine::new(output, config);
        engine.initialize_with(vec![
            Song::new("One", "A", "https://cdn.example/1.mp3"),
            Song::new("Two", "B", "https://cdn.example/2.mp3"),
        ]);

        let mut seen = 0;
        let report = run_simulation(
            &mut engine,
            Duration::from_secs(5),
            Duration::from_millis(500),
            |_| seen += 1,
        );

        assert_eq!(report.songs_finished, 2);
        assert_eq!(seen, report.events.len());
        assert_eq!(engine.current_index(), 0);
    }
}
