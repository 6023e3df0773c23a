//! Mood classification for audio features
//!
//! Maps a mood label onto valence/energy thresholds. A track matches a
//! mood when every configured bound holds; a mood with no bounds (an
//! unrecognized label) matches every track.

use muselink_spotify_client::AudioFeatures;

/// Threshold set for one mood label
///
/// Each bound is optional. `matches` requires all configured bounds to
/// hold simultaneously, so an empty set is satisfied by any track.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoodThresholds {
    pub min_valence: Option<f64>,
    pub max_valence: Option<f64>,
    pub min_energy: Option<f64>,
    pub max_energy: Option<f64>,
}

impl MoodThresholds {
    /// Look up the thresholds for a mood label (case-insensitive)
    ///
    /// Known moods:
    /// - `happy`: valence >= 0.7 and energy >= 0.7
    /// - `sad`: valence <= 0.3 and energy <= 0.3
    /// - `energetic`: energy >= 0.8
    /// - `calm`: energy <= 0.4
    ///
    /// Unknown labels return the empty set, which matches everything.
    pub fn for_mood(mood: &str) -> Self {
        match mood.to_lowercase().as_str() {
            "happy" => Self {
                min_valence: Some(0.7),
                min_energy: Some(0.7),
                ..Self::default()
            },
            "sad" => Self {
                max_valence: Some(0.3),
                max_energy: Some(0.3),
                ..Self::default()
            },
            "energetic" => Self {
                min_energy: Some(0.8),
                ..Self::default()
            },
            "calm" => Self {
                max_energy: Some(0.4),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Check whether a track's features satisfy every configured bound
    pub fn matches(&self, features: &AudioFeatures) -> bool {
        if let Some(min) = self.min_valence {
            if features.valence < min {
                return false;
            }
        }
        if let Some(max) = self.max_valence {
            if features.valence > max {
                return false;
            }
        }
        if let Some(min) = self.min_energy {
            if features.energy < min {
                return false;
            }
        }
        if let Some(max) = self.max_energy {
            if features.energy > max {
                return false;
            }
        }
        true
    }
}
