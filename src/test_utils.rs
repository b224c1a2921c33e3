//! Test utilities and fixtures for song-tagger tests.
//!
//! This module provides recognition response fixtures and a tiny real audio
//! file to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{canonical_response, write_silent_wav};
//!
//! #[test]
//! fn test_something() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let audio = write_silent_wav(dir.path(), "track.wav");
//!     let tree = canonical_response();
//!     // ... test logic
//! }
//! ```

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// A trimmed Shazam-style track response.
///
/// Under the default field mappings it produces:
///
/// | field           | value                               |
/// |-----------------|-------------------------------------|
/// | `primary_genre` | `Dance`                             |
/// | `trackTitle`    | `Side Effects (feat. Emily Warren)` |
/// | `trackArtist`   | `The Chainsmokers`                  |
/// | `Album`         | `Sick Boy`                          |
/// | `Label`         | `Disruptor Records/Columbia`        |
/// | `Released`      | `2018`                              |
pub fn canonical_response() -> Value {
    json!({
        "matches": [
            {
                "id": "432365947",
                "offset": 31.4296875,
                "timeskew": 0.00012058020,
                "frequencyskew": 0.0
            }
        ],
        "location": {"accuracy": 0.01},
        "timestamp": 1707128597475u64,
        "timezone": "Europe/Moscow",
        "track": {
            "layout": "5",
            "type": "MUSIC",
            "key": "432365947",
            "title": "Side Effects (feat. Emily Warren)",
            "subtitle": "The Chainsmokers",
            "genres": {"primary": "Dance"},
            "urlparams": {
                "{tracktitle}": "Side+Effects+%28feat.+Emily+Warren%29",
                "{trackartist}": "The+Chainsmokers"
            },
            "isrc": "USQX91801629",
            "sections": [
                {
                    "type": "SONG",
                    "metapages": [
                        {"image": "https://is1-ssl.mzstatic.com/image/thumb/400x400cc.jpg", "caption": "The Chainsmokers"}
                    ],
                    "tabname": "Song",
                    "metadata": [
                        {"title": "Album", "text": "Sick Boy"},
                        {"title": "Label", "text": "Disruptor Records/Columbia"},
                        {"title": "Released", "text": "2018"}
                    ]
                },
                {
                    "type": "LYRICS",
                    "text": ["I'm a sucker for a good time"],
                    "footer": "Writer(s): Andrew Taggart",
                    "tabname": "Lyrics"
                }
            ]
        }
    })
}

/// A response whose `sections` sit at the root.
pub fn sections_response() -> Value {
    json!({
        "sections": [
            {
                "metadata": [
                    {"title": "Album", "text": "Sick Boy"},
                    {"title": "Label", "text": "Disruptor Records/Columbia"},
                    {"title": "Released", "text": "2018"}
                ]
            }
        ]
    })
}

/// Write a short silent PCM WAV file and return its path.
///
/// Mono, 8 kHz, 16-bit, a tenth of a second long. Small enough to write per
/// test, real enough for lofty to probe and tag.
pub fn write_silent_wav(dir: &Path, name: &str) -> PathBuf {
    const SAMPLE_RATE: u32 = 8000;
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    const DATA_LEN: u32 = 1600;

    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = SAMPLE_RATE * u32::from(block_align);

    let mut bytes = Vec::with_capacity(44 + DATA_LEN as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + DATA_LEN).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&CHANNELS.to_le_bytes());
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&DATA_LEN.to_le_bytes());
    bytes.resize(bytes.len() + DATA_LEN as usize, 0);

    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write test WAV file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_wav_has_declared_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_silent_wav(dir.path(), "silence.wav");
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(bytes.len(), 44 + 1600);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }
}
