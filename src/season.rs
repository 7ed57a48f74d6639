//! Seasonal palette supplier
//!
//! The spawn selector never computes a palette itself; it asks a
//! `PaletteSupplier` for the one active at the current time.

use serde::{Deserialize, Serialize};

use crate::sim::state::PetalColor;
use crate::sim::spawn::Palette;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Supplies the active color palette for a Unix-millisecond timestamp
pub trait PaletteSupplier {
    fn palette(&self, now_ms: f64) -> Palette;
}

/// A fixed palette, regardless of time
impl PaletteSupplier for Palette {
    fn palette(&self, _now_ms: f64) -> Palette {
        self.clone()
    }
}

impl<F> PaletteSupplier for F
where
    F: Fn(f64) -> Palette,
{
    fn palette(&self, now_ms: f64) -> Palette {
        self(now_ms)
    }
}

/// Meteorological season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Northern-hemisphere season for a month (1-12)
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Season::Spring => Season::Autumn,
            Season::Summer => Season::Winter,
            Season::Autumn => Season::Spring,
            Season::Winter => Season::Summer,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Season::Spring => Palette::new(
                "spring",
                [
                    (PetalColor::Sakura, 6.0),
                    (PetalColor::Blossom, 3.0),
                    (PetalColor::Plum, 1.0),
                ],
            ),
            Season::Summer => Palette::new(
                "summer",
                [(PetalColor::Leaf, 5.0), (PetalColor::Sakura, 3.0), (PetalColor::Blossom, 2.0)],
            ),
            Season::Autumn => Palette::new(
                "autumn",
                [(PetalColor::Maple, 5.0), (PetalColor::Amber, 4.0), (PetalColor::Plum, 1.0)],
            ),
            Season::Winter => Palette::new(
                "winter",
                [(PetalColor::Frost, 6.0), (PetalColor::Plum, 2.0), (PetalColor::Sakura, 2.0)],
            ),
        }
    }
}

/// Hemisphere the calendar reads seasons for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Hemisphere {
    #[default]
    Northern,
    Southern,
}

/// Picks the palette for the season a timestamp falls in (UTC)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SeasonalCalendar {
    pub hemisphere: Hemisphere,
}

impl SeasonalCalendar {
    pub fn new(hemisphere: Hemisphere) -> Self {
        Self { hemisphere }
    }

    pub fn season_at(&self, now_ms: f64) -> Season {
        let season = Season::from_month(month_of(now_ms));
        match self.hemisphere {
            Hemisphere::Northern => season,
            Hemisphere::Southern => season.opposite(),
        }
    }
}

impl PaletteSupplier for SeasonalCalendar {
    fn palette(&self, now_ms: f64) -> Palette {
        self.season_at(now_ms).palette()
    }
}

/// Calendar month (1-12, UTC) of a Unix-millisecond timestamp
pub fn month_of(now_ms: f64) -> u32 {
    let days = (now_ms / MS_PER_DAY).floor() as i64;
    civil_month(days)
}

/// Month of the proleptic Gregorian date `days` after 1970-01-01
fn civil_month(days: i64) -> u32 {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    if mp < 10 { (mp + 3) as u32 } else { (mp - 9) as u32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_of() {
        assert_eq!(month_of(0.0), 1);
        assert_eq!(month_of(-86_400_000.0), 12); // 1969-12-31
        assert_eq!(month_of(1_705_276_800_000.0), 1); // 2024-01-15
        assert_eq!(month_of(1_711_929_600_000.0), 4); // 2024-04-01
        assert_eq!(month_of(1_719_792_000_000.0), 7); // 2024-07-01
        assert_eq!(month_of(1_729_036_800_000.0), 10); // 2024-10-16
        assert_eq!(month_of(1_701_388_800_000.0), 12); // 2023-12-01
    }

    #[test]
    fn test_northern_seasons() {
        let cal = SeasonalCalendar::default();
        assert_eq!(cal.season_at(1_711_929_600_000.0), Season::Spring);
        assert_eq!(cal.season_at(1_719_792_000_000.0), Season::Summer);
        assert_eq!(cal.season_at(1_729_036_800_000.0), Season::Autumn);
        assert_eq!(cal.season_at(1_705_276_800_000.0), Season::Winter);
    }

    #[test]
    fn test_southern_seasons_flip() {
        let cal = SeasonalCalendar::new(Hemisphere::Southern);
        assert_eq!(cal.season_at(1_711_929_600_000.0), Season::Autumn);
        assert_eq!(cal.season_at(1_705_276_800_000.0), Season::Summer);
    }

    #[test]
    fn test_supplier_impls() {
        let cal = SeasonalCalendar::default();
        assert_eq!(cal.palette(1_729_036_800_000.0).name, "autumn");

        let fixed = Palette::normal();
        assert_eq!(fixed.palette(0.0), Palette::normal());

        let closure = |_now: f64| Season::Winter.palette();
        assert_eq!(closure.palette(0.0).name, "winter");
    }

    #[test]
    fn test_season_palettes_have_no_gold() {
        for season in [Season::Spring, Season::Summer, Season::Autumn, Season::Winter] {
            let palette = season.palette();
            assert!(!palette.colors.is_empty());
            let reserved = [PetalColor::Gold, PetalColor::Iris];
            assert!(palette.colors.iter().all(|c| !reserved.contains(c)));
        }
    }
}
