//! Plain-text responses for break and status requests.

use crate::state::{BreakOutcome, StateSnapshot, ALERT_MAX, PRESSURE_MAX};

pub fn break_response(emoji: &str, outcome: &BreakOutcome) -> String {
    format!(
        "{emoji} {}\n\nBreak Summary: {}\nStress Level: {}\nBoss Alert Level: {}",
        outcome.message, outcome.summary, outcome.pressure_level, outcome.alert_level
    )
}

/// Status check built from the projected pressure, so idle time shows up.
pub fn status_response(snapshot: &StateSnapshot) -> String {
    let stress = snapshot.projected_pressure_level;
    let alert = snapshot.alert_level;

    let (emoji, stress_msg) = match stress {
        80.. => ("😰", "Critical stress levels! Emergency break needed!"),
        50..=79 => ("😅", "Moderate stress building up..."),
        20..=49 => ("😌", "Slightly stressed but manageable"),
        _ => ("😎", "Chill and relaxed!"),
    };
    let boss_msg = match alert {
        4.. => "🚨 Boss is VERY suspicious! Be careful!",
        2..=3 => "⚠️ Boss is getting suspicious...",
        _ => "✅ Boss is not paying attention",
    };

    format!(
        "{emoji} Current Status Check\n\n{stress_msg}\n{boss_msg}\n\n📊 Stress Level: {stress}/{PRESSURE_MAX}\n👀 Boss Alert Level: {alert}/{ALERT_MAX}"
    )
}
