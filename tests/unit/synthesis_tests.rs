/*!
 * Tests for synthesis service types, the mock engine and the cache
 */

use advox::app_config::VoiceConfig;
use advox::synthesis::{
    MockSynthesizer, SpeechSynthesizer, SynthesisCache, SynthesisRequest, VoiceSettings,
};

fn request(text: &str) -> SynthesisRequest {
    SynthesisRequest {
        text: text.to_string(),
        voice: VoiceSettings::new("vdain", 0, 0, 0),
    }
}

#[test]
fn test_voice_settings_fromConfig_shouldClampOutOfRangeValues() {
    let config = VoiceConfig {
        speaker: "nara".to_string(),
        speed: 7,
        pitch: -12,
        volume: 3,
    };

    let voice = VoiceSettings::from(&config);

    assert_eq!(voice.speaker, "nara");
    assert_eq!(voice.speed, 5);
    assert_eq!(voice.pitch, -5);
    assert_eq!(voice.volume, 3);
}

#[tokio::test]
async fn test_mock_synthesizer_withFixedRate_shouldReturnDeterministicDurations() {
    let mock = MockSynthesizer::working().with_chars_per_second(5.0);

    let audio = mock.synthesize(&request("abcdefghij")).await.unwrap();
    assert!((audio.duration_secs - 2.0).abs() < 1e-9);

    // Same input, same duration - byte-level determinism for tests
    let again = mock.synthesize(&request("abcdefghij")).await.unwrap();
    assert_eq!(audio.audio, again.audio);
}

#[tokio::test]
async fn test_mock_synthesizer_shouldCountCalls() {
    let mock = MockSynthesizer::working();
    assert_eq!(mock.call_count(), 0);

    mock.synthesize(&request("a")).await.unwrap();
    mock.synthesize(&request("b")).await.unwrap();
    assert_eq!(mock.call_count(), 2);
}

#[test]
fn test_synthesis_cache_withSameTextAndVoice_shouldHit() {
    let cache = SynthesisCache::default();
    let voice = VoiceSettings::new("vdain", 0, 0, 0);
    let audio = advox::synthesis::SynthesizedAudio {
        audio: bytes::Bytes::from_static(b"payload"),
        duration_secs: 1.5,
    };

    assert!(cache.get("hello", &voice).is_none());
    cache.store("hello", &voice, &audio);

    let hit = cache.get("hello", &voice).unwrap();
    assert_eq!(hit.duration_secs, 1.5);

    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!((hits, misses), (1, 1));
    assert!((hit_rate - 0.5).abs() < 1e-9);
}

#[test]
fn test_synthesis_cache_withDifferentVoice_shouldMiss() {
    let cache = SynthesisCache::default();
    let voice_a = VoiceSettings::new("vdain", 0, 0, 0);
    let voice_b = VoiceSettings::new("vdain", 1, 0, 0);
    let audio = advox::synthesis::SynthesizedAudio {
        audio: bytes::Bytes::from_static(b"payload"),
        duration_secs: 1.5,
    };

    cache.store("hello", &voice_a, &audio);
    // A different prosody setting is a different rendition
    assert!(cache.get("hello", &voice_b).is_none());
}

#[test]
fn test_synthesis_cache_whenDisabled_shouldNeverStore() {
    let cache = SynthesisCache::new(false);
    let voice = VoiceSettings::new("vdain", 0, 0, 0);
    let audio = advox::synthesis::SynthesizedAudio {
        audio: bytes::Bytes::from_static(b"payload"),
        duration_secs: 1.5,
    };

    cache.store("hello", &voice, &audio);
    assert!(cache.get("hello", &voice).is_none());
    assert!(cache.is_empty());
}
