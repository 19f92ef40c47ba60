use serde::{Deserialize, Serialize};

/// Lowest score a plant can reach.
pub const MIN_HEALTH: i32 = 10;
/// Highest score a plant can reach.
pub const MAX_HEALTH: i32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlantHealth {
    pub current: u32,
    pub state: PlantState,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlantState {
    Thriving,
    Okay,
    Sad,
    Dying,
}

impl PlantState {
    /// Projects a health score onto the plant state. No hysteresis.
    pub fn from_score(score: u32) -> Self {
        match score {
            76.. => PlantState::Thriving,
            51..=75 => PlantState::Okay,
            26..=50 => PlantState::Sad,
            _ => PlantState::Dying,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            PlantState::Thriving => "🌺",
            PlantState::Okay => "🌿",
            PlantState::Sad => "🍃",
            PlantState::Dying => "🥀",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlantState::Thriving => "thriving",
            PlantState::Okay => "okay",
            PlantState::Sad => "sad",
            PlantState::Dying => "dying",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        }
    }
}
