use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::core::calendar::{CalendarFrame, MAX_WINDOW_DAYS};
use crate::ledger::{is_valid_amount, Category};

/// User preferences for the tracker. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Days shown by the spending chart and the balance trend.
    #[serde(default = "Config::default_window_days")]
    pub window_days: usize,
    /// Entries listed under "recent transactions".
    #[serde(default = "Config::default_recent_limit")]
    pub recent_limit: usize,
    /// Reference frame for calendar days, as minutes east of UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "Config::default_quick_amounts")]
    pub quick_amounts: Vec<f64>,
    #[serde(default = "Config::default_category")]
    pub default_category: Category,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Overrides where the ledger snapshot is stored. Defaults to `<data dir>/store`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_days: Self::default_window_days(),
            recent_limit: Self::default_recent_limit(),
            utc_offset_minutes: 0,
            quick_amounts: Self::default_quick_amounts(),
            default_category: Self::default_category(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_window_days() -> usize {
        30
    }

    pub fn default_recent_limit() -> usize {
        5
    }

    pub fn default_quick_amounts() -> Vec<f64> {
        vec![5.0, 10.0, 20.0, 50.0, 100.0]
    }

    pub fn default_category() -> Category {
        Category::Food
    }

    /// Chart window clamped to between one day and [`MAX_WINDOW_DAYS`].
    pub fn effective_window_days(&self) -> usize {
        self.window_days.clamp(1, MAX_WINDOW_DAYS)
    }

    /// Calendar frame from `utc_offset_minutes`, or UTC when the offset is out of range.
    pub fn frame(&self) -> CalendarFrame {
        CalendarFrame::from_offset_minutes(self.utc_offset_minutes).unwrap_or_else(|| {
            warn!(
                offset_minutes = self.utc_offset_minutes,
                "utc offset outside ±14h; bucketing in UTC"
            );
            CalendarFrame::utc()
        })
    }

    /// Configured quick amounts that are usable as expense amounts.
    pub fn valid_quick_amounts(&self) -> Vec<f64> {
        self.quick_amounts
            .iter()
            .copied()
            .filter(|amount| is_valid_amount(*amount))
            .collect()
    }

    pub fn is_quick_amount(&self, amount: f64) -> bool {
        self.valid_quick_amounts()
            .iter()
            .any(|quick| (quick - amount).abs() < f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str("{\"recent_limit\": 8}").unwrap();
        assert_eq!(config.recent_limit, 8);
        assert_eq!(config.window_days, 30);
        assert_eq!(config.default_category, Category::Food);
        assert_eq!(config.quick_amounts, vec![5.0, 10.0, 20.0, 50.0, 100.0]);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn zero_window_is_floored_to_one_day() {
        let config = Config {
            window_days: 0,
            ..Config::default()
        };
        assert_eq!(config.effective_window_days(), 1);

        let huge = Config {
            window_days: usize::MAX,
            ..Config::default()
        };
        assert_eq!(huge.effective_window_days(), MAX_WINDOW_DAYS);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let config = Config {
            utc_offset_minutes: 20 * 60,
            ..Config::default()
        };
        assert_eq!(config.frame(), CalendarFrame::utc());

        let config = Config {
            utc_offset_minutes: -300,
            ..Config::default()
        };
        assert_eq!(config.frame().offset_minutes(), -300);
    }

    #[test]
    fn quick_amounts_skip_unusable_values() {
        let config = Config {
            quick_amounts: vec![5.0, 0.0, -2.0, 20.0],
            ..Config::default()
        };
        assert_eq!(config.valid_quick_amounts(), vec![5.0, 20.0]);
        assert!(config.is_quick_amount(20.0));
        assert!(!config.is_quick_amount(7.0));
    }
}
