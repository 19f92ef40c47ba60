use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{PlantHealth, PlantState};

/// Current streak at which the plant cheers the streak instead of its state.
pub const HOT_STREAK_DAYS: u32 = 7;

const FALLBACK: &str = "Hello there! 👋";

const HOT_STREAK: &[&str] = &[
    "You're on fire! 🔥",
    "Amazing streak! 🚀",
    "Coding machine! ⚡",
    "Keep it up! 💪",
];

const THRIVING: &[&str] = &[
    "I'm flourishing! 🌟",
    "Life is good! ✨",
    "Thanks for caring! 💚",
    "We make a great team! 🤝",
];

const OKAY: &[&str] = &[
    "Doing well! 😊",
    "Keep coding! 💻",
    "I believe in you! 🌱",
    "Steady progress! 📈",
];

const SAD: &[&str] = &[
    "I'm feeling lonely... 😔",
    "Missing your commits! 💔",
    "Code with me? 🥺",
    "I need some love! 💙",
];

const DYING: &[&str] = &[
    "Help me grow! 🆘",
    "I need commits! 😵",
    "Don't give up on me! 💔",
    "Code saves lives! 🚨",
];

fn pool(health: &PlantHealth, current_streak: u32) -> &'static [&'static str] {
    if current_streak >= HOT_STREAK_DAYS {
        return HOT_STREAK;
    }
    match health.state {
        PlantState::Thriving => THRIVING,
        PlantState::Okay => OKAY,
        PlantState::Sad => SAD,
        PlantState::Dying => DYING,
    }
}

/// Picks what the plant says. All randomness comes from `rng`.
pub fn mood_message<R: Rng + ?Sized>(
    health: &PlantHealth,
    current_streak: u32,
    rng: &mut R,
) -> &'static str {
    pool(health, current_streak)
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK)
}
