//! The fixed catalog of selectable ambient tracks.
//!
//! The catalog is a compiled-in, ordered table. Each entry pairs a stable
//! identifier with a display label and the asset stem the playback layer
//! resolves to an audio file. The first entry is the default selection.

use serde::{Deserialize, Serialize};

// ============================================================================
// SoundId
// ============================================================================

/// Stable identifier of a selectable ambient track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    /// Rainfall
    Rain,
    /// Coffee shop murmur
    Ocean,
    /// Birdsong in a forest
    Forest,
    /// Waves on a shore
    BrownNoise,
}

impl SoundId {
    /// Returns the stable name of this identifier.
    pub fn name(&self) -> &'static str {
        match self {
            SoundId::Rain => "rain",
            SoundId::Ocean => "ocean",
            SoundId::Forest => "forest",
            SoundId::BrownNoise => "brown_noise",
        }
    }

    /// Looks up an identifier by its stable name, case-insensitively.
    ///
    /// Accepts `-` as an alias for `_` so CLI input like `brown-noise`
    /// resolves as well.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        CATALOG
            .iter()
            .find(|entry| entry.id.name() == normalized)
            .map(|entry| entry.id)
    }

    /// Returns the display label of this track.
    pub fn label(&self) -> &'static str {
        self.entry().label
    }

    /// Returns the asset stem resolved by the playback layer.
    pub fn asset(&self) -> &'static str {
        self.entry().asset
    }

    /// Returns the catalog entry for this identifier.
    pub fn entry(&self) -> &'static SoundEntry {
        match self {
            SoundId::Rain => &CATALOG[0],
            SoundId::Ocean => &CATALOG[1],
            SoundId::Forest => &CATALOG[2],
            SoundId::BrownNoise => &CATALOG[3],
        }
    }
}

impl Default for SoundId {
    /// The catalog's first entry.
    fn default() -> Self {
        CATALOG[0].id
    }
}

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SoundEntry / CATALOG
// ============================================================================

/// One catalog row: identifier, display label, opaque asset reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundEntry {
    /// Stable identifier
    pub id: SoundId,
    /// Label shown to the user
    pub label: &'static str,
    /// Asset stem; resolution is the playback layer's concern
    pub asset: &'static str,
}

/// The fixed, ordered sound catalog.
///
/// The `Ocean` id has mapped to the cafe recording since the first release;
/// renaming the id would break saved selections, so the label and asset
/// describe what actually plays.
pub const CATALOG: &[SoundEntry] = &[
    SoundEntry {
        id: SoundId::Rain,
        label: "雨音",
        asset: "rain",
    },
    SoundEntry {
        id: SoundId::Ocean,
        label: "カフェの喧騒",
        asset: "cafe",
    },
    SoundEntry {
        id: SoundId::Forest,
        label: "森の鳥のさえずり",
        asset: "forest",
    },
    SoundEntry {
        id: SoundId::BrownNoise,
        label: "波の音",
        asset: "waves",
    },
];

// ============================================================================
// Tests
// ============================================================================
