// src/analysis/pressure.rs
use crate::domain::models::PriceBar;

pub const MIN_LONG_SHORT_RATIO: f64 = 0.01;
pub const MAX_LONG_SHORT_RATIO: f64 = 100.0;

/// Long/short pressure as up-volume over down-volume.
///
/// A bar is "up" when it closes above its open and "down" when it closes below;
/// unchanged bars count for neither side. With no directional volume at all the
/// ratio is neutral (1.0). The result is clamped to
/// [`MIN_LONG_SHORT_RATIO`, `MAX_LONG_SHORT_RATIO`] so it stays positive and finite.
pub fn long_short_ratio(bars: &[PriceBar]) -> f64 {
    let (up_volume, down_volume) = bars.iter().fold((0.0, 0.0), |(up, down), bar| {
        if bar.close > bar.open {
            (up + bar.volume, down)
        } else if bar.close < bar.open {
            (up, down + bar.volume)
        } else {
            (up, down)
        }
    });

    if up_volume == 0.0 && down_volume == 0.0 {
        return 1.0;
    }
    if down_volume == 0.0 {
        return MAX_LONG_SHORT_RATIO;
    }

    (up_volume / down_volume).clamp(MIN_LONG_SHORT_RATIO, MAX_LONG_SHORT_RATIO)
}
