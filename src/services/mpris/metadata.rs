use std::collections::HashMap;

use super::{
    conversion::{self, format_duration, store},
    value::PropertyValue,
};

/// Metadata information for a music track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    /// Track artist; multiple artists are joined with commas
    pub artist: String,

    /// Track title
    pub title: String,

    /// Album name
    pub album: String,

    /// MPRIS track identifier (an object path)
    pub track_id: String,

    /// Track length in microseconds
    pub length: u64,

    /// Location of the media
    pub url: String,

    /// URL to album artwork image
    pub art_url: String,
}

impl TrackMetadata {
    /// Track length rendered as `MM:SS` or `HH:MM:SS`.
    pub fn duration(&self) -> String {
        format_duration(self.length)
    }

    /// Apply a metadata dictionary on top of the current values.
    ///
    /// Keys absent from `entries` keep their previous values. Returns whether
    /// any recognised key was present.
    pub fn merge(&mut self, entries: &HashMap<String, PropertyValue>) -> bool {
        let mut touched = false;

        for (key, value) in entries {
            let value = Some(value);
            touched |= match key.as_str() {
                "xesam:artist" => store(&mut self.artist, conversion::to_string(value)),
                "xesam:title" => store(&mut self.title, conversion::to_string(value)),
                "xesam:album" => store(&mut self.album, conversion::to_string(value)),
                "xesam:url" => store(&mut self.url, conversion::to_string(value)),
                "mpris:trackid" => store(&mut self.track_id, conversion::to_string(value)),
                "mpris:artUrl" => store(&mut self.art_url, conversion::to_string(value)),
                "mpris:length" => store(&mut self.length, conversion::to_u64(value)),
                _ => false,
            };
        }

        touched
    }
}
