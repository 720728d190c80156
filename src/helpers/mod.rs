//! Presentation helpers
//!
//! Pure formatting used by the CLI and the page-data endpoints.

mod date;

pub use date::*;

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::error::Result;

/// Formatting bound to the site's timezone
#[derive(Debug, Clone)]
pub struct Helpers {
    tz: chrono_tz::Tz,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self { tz: config.tz()? })
    }

    /// Short date, or an empty string for unpublished content
    pub fn short_date(&self, date: Option<&DateTime<Utc>>) -> String {
        date.map(|d| format_short(d, &self.tz)).unwrap_or_default()
    }

    /// Long date with time, or an empty string for unpublished content
    pub fn long_date(&self, date: Option<&DateTime<Utc>>) -> String {
        date.map(|d| format_long(d, &self.tz)).unwrap_or_default()
    }

    /// Human reading-time label; zero minutes reads as under a minute
    pub fn reading_time(&self, minutes: u32) -> String {
        if minutes == 0 {
            "< 1 min".to_string()
        } else {
            format!("{} min", minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_helpers() {
        let config = SiteConfig {
            timezone: "UTC".to_string(),
            ..SiteConfig::default()
        };
        let helpers = Helpers::new(&config).unwrap();
        let date = Utc.with_ymd_and_hms(2021, 3, 19, 15, 49, 0).unwrap();
        assert_eq!(helpers.short_date(Some(&date)), "19 mar 2021");
        assert_eq!(helpers.long_date(Some(&date)), "19 mar 2021, às 15:49");
        assert_eq!(helpers.short_date(None), "");
        assert_eq!(helpers.reading_time(0), "< 1 min");
        assert_eq!(helpers.reading_time(4), "4 min");
    }
}
