/*!
 * Synthesis result caching.
 *
 * Narration text repeats across audio-description scripts (recurring
 * character names, scene transitions). Caching by text and voice avoids
 * re-synthesizing identical requests within a batch.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use super::{SynthesizedAudio, VoiceSettings};

/// Cache key combining narration text and the full voice parameter set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Narration text
    text: String,
    /// Speaker identifier
    speaker: String,
    /// Prosody parameters
    speed: i8,
    pitch: i8,
    volume: i8,
}

impl CacheKey {
    fn new(text: &str, voice: &VoiceSettings) -> Self {
        Self {
            text: text.to_string(),
            speaker: voice.speaker.clone(),
            speed: voice.speed,
            pitch: voice.pitch,
            volume: voice.volume,
        }
    }
}

/// Cache of synthesized audio for storing and retrieving results
pub struct SynthesisCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<CacheKey, SynthesizedAudio>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl SynthesisCache {
    /// Create a new synthesis cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Get a synthesized result from the cache
    pub fn get(&self, text: &str, voice: &VoiceSettings) -> Option<SynthesizedAudio> {
        if !self.enabled {
            return None;
        }

        let key = CacheKey::new(text, voice);
        let cache = self.cache.read();

        match cache.get(&key) {
            Some(audio) => {
                let mut hits = self.hits.write();
                *hits += 1;

                debug!("Synthesis cache hit for '{}'", truncate_text(text, 30));
                Some(audio.clone())
            },
            None => {
                let mut misses = self.misses.write();
                *misses += 1;
                None
            },
        }
    }

    /// Store a synthesized result in the cache
    pub fn store(&self, text: &str, voice: &VoiceSettings, audio: &SynthesizedAudio) {
        if !self.enabled {
            return;
        }

        let key = CacheKey::new(text, voice);
        let mut cache = self.cache.write();
        cache.insert(key, audio.clone());
    }

    /// Get cache statistics
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl Default for SynthesisCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Clone for SynthesisCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}

/// Truncate text to a maximum length with ellipsis
fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_length).collect::<String>())
    }
}
