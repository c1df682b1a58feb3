//! Channel identity for the two capture sources.
//!
//! Every recording session captures exactly two independent inputs. All
//! per-channel artifacts (WAV files, transcript files, merged-line prefixes)
//! are named through this type so the labels stay consistent end to end.

use serde::{Deserialize, Serialize};

/// Identifies one of the two capture channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelId {
    /// First input, typically the microphone
    A,
    /// Second input, typically a system-loopback ("stereo mix") device
    B,
}

impl ChannelId {
    /// Human-readable label used as the source tag in merged transcripts.
    pub fn label(&self) -> &'static str {
        match self {
            ChannelId::A => "Channel A",
            ChannelId::B => "Channel B",
        }
    }

    /// File-name stem for per-channel output files.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChannelId::A => "channel_a",
            ChannelId::B => "channel_b",
        }
    }

    /// Parses a channel selector as given on the command line.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_ascii_lowercase().as_str() {
            "a" | "channel_a" => Some(ChannelId::A),
            "b" | "channel_b" => Some(ChannelId::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
