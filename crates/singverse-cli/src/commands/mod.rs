//! CLI command implementations.
//!
//! Each command returns `anyhow::Result<ExitCode>`; `main` reports errors.

pub mod books;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod melody;
pub mod normalize;
pub mod read;
pub mod render;
pub mod resume;
pub mod search;
pub mod speak;

use anyhow::{anyhow, bail, Result};
use clap::Args;
use singverse_bible::{
    parse_reference, parse_route, resolve_route, BibleData, Selection, Verse,
};
use singverse_melody::{Key, MelodySettings, PlaybackSettings, Scale};

use crate::cache::CacheManager;
use crate::config::Config;
use crate::source::{default_downloader, load_bible};

/// Loaded configuration, cache, and verse data shared by reader commands.
pub struct Reader {
    pub config: Config,
    pub cache: CacheManager,
    pub data: BibleData,
}

impl Reader {
    /// Loads config and verse data, downloading the data on first use.
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let cache = CacheManager::new()?;
        let data = load_bible(&config, &cache, default_downloader().as_ref())?;
        Ok(Self {
            config,
            cache,
            data,
        })
    }
}

/// Melody and tempo overrides shared by the playback commands.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct MelodyArgs {
    /// Key (C, C#, Db, ... B)
    #[arg(long)]
    pub key: Option<Key>,

    /// Scale (major, minor, pentatonic)
    #[arg(long)]
    pub scale: Option<Scale>,

    /// Lowest octave
    #[arg(long)]
    pub low_octave: Option<i8>,

    /// Highest octave
    #[arg(long)]
    pub high_octave: Option<i8>,

    /// Tempo multiplier (0.5-1.8)
    #[arg(long)]
    pub tempo: Option<f64>,

    /// Volume (0.0-1.0)
    #[arg(long)]
    pub volume: Option<f64>,
}

impl MelodyArgs {
    /// Applies the overrides on top of the configured settings.
    pub fn apply(&self, config: &Config) -> Result<(MelodySettings, PlaybackSettings)> {
        let mut melody = config.melody;
        if let Some(key) = self.key {
            melody.key = key;
        }
        if let Some(scale) = self.scale {
            melody.scale = scale;
        }
        if let Some(low) = self.low_octave {
            melody.low_octave = low;
        }
        if let Some(high) = self.high_octave {
            melody.high_octave = high;
        }

        let mut playback = config.playback.clone();
        if let Some(tempo) = self.tempo {
            playback.tempo = tempo;
        }
        if let Some(volume) = self.volume {
            playback.volume = volume;
        }

        melody.validate()?;
        playback.validate()?;
        Ok((melody, playback))
    }
}

/// Resolves user input to a position: a reader route (`/v/john/3/16`) or a
/// reference (`John 3:16`).
pub fn resolve_target(data: &BibleData, input: &str) -> Result<Selection> {
    let input = input.trim();
    if input.starts_with('/') || input.starts_with('#') {
        if parse_route(input).is_none() {
            bail!("'{}' is not a reader route (expected /b/<book>/<chapter> or /v/<book>/<chapter>/<verse>)", input);
        }
        return resolve_route(data, input).ok_or_else(|| anyhow!("verse data has no books"));
    }
    parse_reference(input, data).ok_or_else(|| anyhow!("no chapter or verse matches '{}'", input))
}

/// Narrows a selection to a verse, taking verse 1 of a chapter selection.
pub fn verse_target<'a>(data: &'a BibleData, selection: &Selection) -> Result<(Selection, &'a Verse)> {
    let selection = match selection.verse {
        Some(_) => selection.clone(),
        None => Selection::verse(selection.book_id.clone(), selection.chapter, 1),
    };
    let verse = data
        .verse(&selection)
        .ok_or_else(|| anyhow!("{} has no such verse", selection.to_route()))?;
    Ok((selection, verse))
}
