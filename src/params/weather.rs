//! Named sea-state presets.

use std::fmt;

use log::warn;

use super::surface::ConfigPatch;

/// Qualitative sea state, each mapping to fixed amplitude, speed and colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherPreset {
    Calm,
    Choppy,
    Stormy,
    /// Reset values, also used for unrecognised names
    #[default]
    Default,
}

impl WeatherPreset {
    pub const ALL: [WeatherPreset; 4] = [
        WeatherPreset::Calm,
        WeatherPreset::Choppy,
        WeatherPreset::Stormy,
        WeatherPreset::Default,
    ];

    /// Look up a preset by name (case-insensitive)
    pub fn lookup(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "calm" => Some(Self::Calm),
            "choppy" => Some(Self::Choppy),
            "stormy" => Some(Self::Stormy),
            "default" | "reset" => Some(Self::Default),
            _ => None,
        }
    }

    /// Resolve a preset by name, falling back to [`WeatherPreset::Default`]
    /// for anything unrecognised
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_else(|| {
            warn!("Unknown weather preset '{}', using default", name);
            Self::Default
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Choppy => "choppy",
            Self::Stormy => "stormy",
            Self::Default => "default",
        }
    }

    /// Wave height (world units)
    pub fn wave_amplitude(self) -> f32 {
        match self {
            Self::Calm => 0.3,
            Self::Choppy => 1.5,
            Self::Stormy => 2.5,
            Self::Default => 0.8,
        }
    }

    /// Clock rate
    pub fn wave_speed(self) -> f32 {
        match self {
            Self::Calm => 0.6,
            Self::Choppy => 2.2,
            Self::Stormy => 3.5,
            Self::Default => 1.2,
        }
    }

    /// Packed 0xRRGGBB
    pub fn color(self) -> u32 {
        match self {
            Self::Calm => 0x1a8cb0,
            Self::Choppy => 0x00557a,
            Self::Stormy => 0x002233,
            Self::Default => 0x006994,
        }
    }

    pub fn patch(self) -> ConfigPatch {
        ConfigPatch::default()
            .with_wave_amplitude(self.wave_amplitude())
            .with_wave_speed(self.wave_speed())
            .with_color(self.color())
    }
}

impl fmt::Display for WeatherPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
