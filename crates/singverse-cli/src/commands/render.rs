//! Render command implementation
//!
//! Renders a verse melody to WAV or MIDI through the render cache. With
//! auto-advance, the following verses of the chapter are rendered after it,
//! each starting when the previous one completes.

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use serde_json::json;
use singverse_bible::{format_reference, BibleData, Selection, Verse};
use singverse_melody::{
    generate_melody, melody_seed, render_midi, render_wav, MelodySettings, PlaybackSettings,
    RenderOptions, Schedule, DEFAULT_SAMPLE_RATE,
};
use std::fs;
use std::process::ExitCode;
use std::str::FromStr;

use super::{resolve_target, verse_target, MelodyArgs, Reader};
use crate::cache::{CacheManager, RenderKey};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Wav,
    Midi,
}

impl RenderFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderFormat::Wav => "wav",
            RenderFormat::Midi => "midi",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wav" => Ok(RenderFormat::Wav),
            "midi" | "mid" => Ok(RenderFormat::Midi),
            other => bail!("unknown render format '{}' (expected wav or midi)", other),
        }
    }
}

/// Verses to render: the selected one, then the rest of its chapter when
/// auto-advancing.
pub fn playlist<'a>(
    data: &'a BibleData,
    selection: &Selection,
    auto_advance: bool,
) -> Result<Vec<(Selection, &'a Verse)>> {
    let (first, verse) = verse_target(data, selection)?;
    let mut verses = vec![(first.clone(), verse)];
    if auto_advance {
        let mut current = first;
        while let Some(next) = current.next_verse(data) {
            let verse = data
                .verse(&next)
                .ok_or_else(|| anyhow!("{} does not exist", next.to_route()))?;
            verses.push((next.clone(), verse));
            current = next;
        }
    }
    Ok(verses)
}

/// Result of a render.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub data: Vec<u8>,
    pub hash: String,
    pub cache_hit: bool,
    pub verses: usize,
    /// Completion time of the rendered timeline, in seconds.
    pub duration: f64,
}

/// Renders the verses through the render cache.
pub fn render_verses(
    cache_mgr: Option<&CacheManager>,
    verses: &[(Selection, &Verse)],
    settings: &MelodySettings,
    playback: &PlaybackSettings,
    format: RenderFormat,
) -> Result<RenderOutcome> {
    let mut schedules = Vec::with_capacity(verses.len());
    let mut seeds = Vec::with_capacity(verses.len());
    for (_, verse) in verses {
        seeds.push(melody_seed(&verse.t, settings));
        let notes = generate_melody(&verse.t, settings);
        schedules.push(Schedule::build(&notes, playback.tempo)?);
    }
    let schedule = Schedule::concat(&schedules);

    let key = RenderKey {
        seeds,
        settings: *settings,
        tempo: playback.tempo,
        volume: playback.volume,
        format: format.as_str().to_string(),
        sample_rate: DEFAULT_SAMPLE_RATE,
        backend_version: format!("{}-v{}", singverse_melody::BACKEND_ID, singverse_melody::VERSION),
    };

    if let Some(cache_mgr) = cache_mgr {
        if let Some(cached) = cache_mgr.get_render(&key)? {
            tracing::debug!(hash = %cached.hash, "render cache hit");
            return Ok(RenderOutcome {
                data: cached.data,
                hash: cached.hash,
                cache_hit: true,
                verses: verses.len(),
                duration: schedule.end,
            });
        }
        tracing::debug!("render cache miss");
    }

    let result = match format {
        RenderFormat::Wav => render_wav(
            &schedule,
            &RenderOptions {
                sample_rate: DEFAULT_SAMPLE_RATE,
                volume: playback.volume,
                ..RenderOptions::default()
            },
        )?,
        RenderFormat::Midi => render_midi(&schedule, playback.volume)?,
    };

    if let Some(cache_mgr) = cache_mgr {
        if let Err(err) = cache_mgr.put_render(&key, &result) {
            tracing::warn!(error = %err, "failed to store render in cache");
        }
    }

    Ok(RenderOutcome {
        data: result.data,
        hash: result.hash,
        cache_hit: false,
        verses: verses.len(),
        duration: schedule.end,
    })
}

/// Run the render command
///
/// # Arguments
/// * `target` - Reference or route of the first verse
/// * `output` - Output file path
/// * `format` - "wav" or "midi"
/// * `auto_advance` - Continue through the rest of the chapter
/// * `args` - Melody and tempo overrides
/// * `no_cache` - Bypass the render cache
/// * `json` - Output machine-readable JSON
pub fn run(
    target: &str,
    output: &str,
    format: &str,
    auto_advance: bool,
    args: &MelodyArgs,
    no_cache: bool,
    json: bool,
) -> Result<ExitCode> {
    let format: RenderFormat = format.parse()?;
    let reader = Reader::open()?;
    let (settings, playback) = args.apply(&reader.config)?;
    let auto_advance = auto_advance || playback.auto_advance;

    let selection = resolve_target(&reader.data, target)?;
    let verses = playlist(&reader.data, &selection, auto_advance)?;
    let cache_mgr = if no_cache { None } else { Some(&reader.cache) };

    let outcome = render_verses(cache_mgr, &verses, &settings, &playback, format)?;
    fs::write(output, &outcome.data)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    let first = format_reference(&reader.data, &verses[0].0);
    let last = format_reference(&reader.data, &verses[verses.len() - 1].0);

    if json {
        let result = json!({
            "success": true,
            "output": output,
            "format": format.as_str(),
            "from": first,
            "to": last,
            "verses": outcome.verses,
            "duration_seconds": outcome.duration,
            "hash": outcome.hash,
            "cache_hit": outcome.cache_hit,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(ExitCode::SUCCESS);
    }

    let range = if outcome.verses > 1 {
        format!("{} - {}", first, last)
    } else {
        first
    };
    println!("{} {}", "Rendering:".cyan().bold(), range);
    println!(
        "  {} {} ({} {}, {:.2}s){}",
        "SUCCESS".green().bold(),
        output,
        outcome.verses,
        if outcome.verses == 1 { "verse" } else { "verses" },
        outcome.duration,
        if outcome.cache_hit {
            " [cached]".dimmed().to_string()
        } else {
            String::new()
        }
    );
    println!("  {}: {}", "Hash".dimmed(), outcome.hash);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use singverse_bible::{Book, Chapter};
    use tempfile::TempDir;

    fn data() -> BibleData {
        let texts = ["Jesus wept.", "Rejoice evermore.", "Pray without ceasing."];
        BibleData {
            books: vec![Book {
                id: "john".to_string(),
                name: "John".to_string(),
                chapters: vec![Chapter {
                    verses: texts
                        .iter()
                        .enumerate()
                        .map(|(i, t)| Verse {
                            n: i as u32 + 1,
                            t: t.to_string(),
                        })
                        .collect(),
                }],
            }],
            order: vec!["john".to_string()],
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("wav".parse::<RenderFormat>().unwrap(), RenderFormat::Wav);
        assert_eq!("MID".parse::<RenderFormat>().unwrap(), RenderFormat::Midi);
        assert!("mp3".parse::<RenderFormat>().is_err());
    }

    #[test]
    fn test_playlist_stops_at_chapter_end() {
        let data = data();
        let single = playlist(&data, &Selection::verse("john", 1, 2), false).unwrap();
        assert_eq!(single.len(), 1);

        let advancing = playlist(&data, &Selection::verse("john", 1, 2), true).unwrap();
        let routes: Vec<String> = advancing.iter().map(|(s, _)| s.to_route()).collect();
        assert_eq!(routes, vec!["/v/john/1/2", "/v/john/1/3"]);

        let whole = playlist(&data, &Selection::chapter("john", 1), true).unwrap();
        assert_eq!(whole.len(), 3);
    }

    #[test]
    fn test_render_uses_cache() {
        let tmp = TempDir::new().unwrap();
        let cache_mgr = CacheManager::with_dir(tmp.path());
        let data = data();
        let verses = playlist(&data, &Selection::verse("john", 1, 1), true).unwrap();
        let settings = MelodySettings::default();
        let playback = PlaybackSettings::default();

        let first =
            render_verses(Some(&cache_mgr), &verses, &settings, &playback, RenderFormat::Midi)
                .unwrap();
        assert!(!first.cache_hit);
        assert_eq!(first.verses, 3);

        let second =
            render_verses(Some(&cache_mgr), &verses, &settings, &playback, RenderFormat::Midi)
                .unwrap();
        assert!(second.cache_hit);
        assert_eq!(second.hash, first.hash);
        assert_eq!(second.data, first.data);

        let uncached =
            render_verses(None, &verses, &settings, &playback, RenderFormat::Midi).unwrap();
        assert!(!uncached.cache_hit);
        assert_eq!(uncached.hash, first.hash);
    }
}
