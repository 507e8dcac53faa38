//! Texture atlas descriptions
//!
//! Accepts the two common TexturePacker JSON layouts: `frames` as an object
//! keyed by frame name, or as an array of entries carrying a `filename`.

use std::collections::HashMap;

use serde::Deserialize;

use super::{AssetError, FrameRect};

#[derive(Debug, Deserialize)]
struct AtlasFile {
    frames: AtlasFrames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AtlasFrames {
    Hash(HashMap<String, AtlasEntry>),
    Array(Vec<NamedAtlasEntry>),
}

#[derive(Debug, Deserialize)]
struct AtlasEntry {
    frame: AtlasRect,
}

#[derive(Debug, Deserialize)]
struct NamedAtlasEntry {
    filename: String,
    frame: AtlasRect,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct AtlasRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl From<AtlasRect> for FrameRect {
    fn from(rect: AtlasRect) -> Self {
        FrameRect::new(rect.x, rect.y, rect.w, rect.h)
    }
}

/// Parse atlas JSON into named frame regions
pub fn parse_frames(bytes: &[u8]) -> Result<HashMap<String, FrameRect>, AssetError> {
    let file: AtlasFile =
        serde_json::from_slice(bytes).map_err(|e| AssetError::Atlas(e.to_string()))?;

    let frames: HashMap<String, FrameRect> = match file.frames {
        AtlasFrames::Hash(entries) => entries
            .into_iter()
            .map(|(name, entry)| (name, entry.frame.into()))
            .collect(),
        AtlasFrames::Array(entries) => entries
            .into_iter()
            .map(|entry| (entry.filename, entry.frame.into()))
            .collect(),
    };

    if frames.is_empty() {
        return Err(AssetError::Atlas("atlas defines no frames".to_string()));
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_layout() {
        let json = br#"{
            "frames": {
                "ship": { "frame": { "x": 0, "y": 0, "w": 16, "h": 8 }, "rotated": false },
                "rock": { "frame": { "x": 16, "y": 0, "w": 8, "h": 8 } }
            },
            "meta": { "image": "sheet.png" }
        }"#;

        let frames = parse_frames(json).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames["rock"], FrameRect::new(16, 0, 8, 8));
    }

    #[test]
    fn test_array_layout() {
        let json = br#"{ "frames": [
            { "filename": "a", "frame": { "x": 1, "y": 2, "w": 3, "h": 4 } }
        ] }"#;

        let frames = parse_frames(json).unwrap();
        assert_eq!(frames["a"], FrameRect::new(1, 2, 3, 4));
    }

    #[test]
    fn test_malformed_json_is_atlas_error() {
        assert!(matches!(parse_frames(b"{ nope"), Err(AssetError::Atlas(_))));
        assert!(matches!(parse_frames(br#"{ "frames": {} }"#), Err(AssetError::Atlas(_))));
    }
}
