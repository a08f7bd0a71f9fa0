//! Supported cities and the BoM products that carry their forecasts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum City {
    Sydney,
    Melbourne,
    Adelaide,
    Brisbane,
    Darwin,
    Perth,
    Hobart,
}

impl City {
    /// Registry order. Aggregates over every city are reported in this order.
    pub const ALL: [City; 7] = [
        City::Sydney,
        City::Melbourne,
        City::Adelaide,
        City::Brisbane,
        City::Darwin,
        City::Perth,
        City::Hobart,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            City::Sydney => "Sydney",
            City::Melbourne => "Melbourne",
            City::Adelaide => "Adelaide",
            City::Brisbane => "Brisbane",
            City::Darwin => "Darwin",
            City::Perth => "Perth",
            City::Hobart => "Hobart",
        }
    }

    /// State product prefix (NSW, VIC, SA, QLD, NT, WA, TAS).
    pub const fn product_prefix(&self) -> &'static str {
        match self {
            City::Sydney => "IDN",
            City::Melbourne => "IDV",
            City::Adelaide => "IDS",
            City::Brisbane => "IDQ",
            City::Darwin => "IDD",
            City::Perth => "IDW",
            City::Hobart => "IDT",
        }
    }

    /// Precis forecast product for the city, without the `.xml` extension.
    pub fn product_id(&self) -> String {
        format!("{}60920", self.product_prefix())
    }

    pub fn names() -> Vec<&'static str> {
        City::ALL.iter().map(City::as_str).collect()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names must match exactly; "sydney" is not a supported city.
impl FromStr for City {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|city| city.as_str() == s)
            .ok_or_else(|| WeatherError::UnsupportedCity {
                city: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_is_fixed() {
        assert_eq!(
            City::names(),
            vec!["Sydney", "Melbourne", "Adelaide", "Brisbane", "Darwin", "Perth", "Hobart"]
        );
    }

    #[test]
    fn parses_every_registered_name() {
        for city in City::ALL {
            assert_eq!(city.as_str().parse::<City>().unwrap(), city);
        }
    }

    #[test]
    fn product_ids() {
        assert_eq!(City::Sydney.product_id(), "IDN60920");
        assert_eq!(City::Hobart.product_id(), "IDT60920");
    }

    #[test]
    fn unknown_city_lists_supported() {
        let err = "Atlantis".parse::<City>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unsupported city 'Atlantis'"));
        for name in City::names() {
            assert!(msg.contains(name), "missing {name} in {msg}");
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!("sydney".parse::<City>().is_err());
    }
}
