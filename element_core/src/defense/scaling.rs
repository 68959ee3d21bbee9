//! Level scaling formulas for armor, shields and shield recovery

use crate::types::seconds_to_ticks;

/// Level from which armor and shields start scaling
pub const SCALING_START_LEVEL: u32 = 20;

/// Highest armor a combatant can scale into
pub const ARMOR_SCALING_CAP: f64 = 2700.0;

/// Shield below which the short immunity curve applies
const IMMUNITY_LOW_SHIELD: f64 = 53.0;
/// Shield from which immunity is fixed
const IMMUNITY_HIGH_SHIELD: f64 = 1150.0;
const IMMUNITY_MAX_SECONDS: f64 = 2.5;

fn levels_over_start(level: u32) -> f64 {
    level.saturating_sub(SCALING_START_LEVEL) as f64
}

/// `1 + 0.4 * max(0, level - 20)^0.75`
pub fn armor_coefficient(level: u32) -> f64 {
    1.0 + 0.4 * levels_over_start(level).powf(0.75)
}

/// Base armor scaled to `level`, never above the armor cap
pub fn scaled_armor(base_armor: f64, level: u32) -> f64 {
    if base_armor <= 0.0 {
        return 0.0;
    }
    let coefficient = armor_coefficient(level).min(ARMOR_SCALING_CAP / base_armor);
    base_armor * coefficient
}

/// `1 + 0.02 * max(0, level - 20)^1.76`; players don't scale
pub fn shield_coefficient(level: u32, is_player: bool) -> f64 {
    if is_player {
        return 1.0;
    }
    1.0 + 0.02 * levels_over_start(level).powf(1.76)
}

/// Shield regenerated per second: `15 + 0.05 * max_shield`
pub fn regen_rate(max_shield: f64) -> f64 {
    15.0 + 0.05 * max_shield.max(0.0)
}

/// Immunity window after the shield breaks, in seconds
pub fn immunity_seconds(max_shield: f64) -> f64 {
    let shield = max_shield.max(0.0);
    if shield < IMMUNITY_LOW_SHIELD {
        shield / 180.0 + 1.0 / 3.0
    } else if shield < IMMUNITY_HIGH_SHIELD {
        (shield / 350.0).powf(0.65) + 1.0 / 3.0
    } else {
        IMMUNITY_MAX_SECONDS
    }
}

pub fn immunity_ticks(max_shield: f64) -> u32 {
    seconds_to_ticks(immunity_seconds(max_shield))
}

/// Ticks before shields start recovering after a hit: (normal, depleted)
pub fn regen_delay_ticks(is_player: bool) -> (u32, u32) {
    if is_player {
        (seconds_to_ticks(2.0), seconds_to_ticks(6.0))
    } else {
        (seconds_to_ticks(3.0), seconds_to_ticks(3.0))
    }
}
