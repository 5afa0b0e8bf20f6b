// Fixed catalogs the user picks from. Both sets are closed: anything that
// doesn't parse into one of these variants never reaches the session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// What the outfit is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Occasion {
    Casual,
    Business,
    Formal,
    Wedding,
    DateNight,
    Party,
    Outdoor,
}

impl Occasion {
    pub const ALL: [Occasion; 7] = [
        Occasion::Casual,
        Occasion::Business,
        Occasion::Formal,
        Occasion::Wedding,
        Occasion::DateNight,
        Occasion::Party,
        Occasion::Outdoor,
    ];

    /// Stable lowercase identifier used in forms, CLI args and JSON.
    pub fn slug(self) -> &'static str {
        match self {
            Occasion::Casual => "casual",
            Occasion::Business => "business",
            Occasion::Formal => "formal",
            Occasion::Wedding => "wedding",
            Occasion::DateNight => "date-night",
            Occasion::Party => "party",
            Occasion::Outdoor => "outdoor",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Occasion::Casual => "Casual",
            Occasion::Business => "Business",
            Occasion::Formal => "Formal",
            Occasion::Wedding => "Wedding",
            Occasion::DateNight => "Date Night",
            Occasion::Party => "Party",
            Occasion::Outdoor => "Outdoor",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Occasion::Casual => "👕",
            Occasion::Business => "💼",
            Occasion::Formal => "🎩",
            Occasion::Wedding => "💍",
            Occasion::DateNight => "🌙",
            Occasion::Party => "🎉",
            Occasion::Outdoor => "🏕️",
        }
    }
}

/// Conditions the outfit has to hold up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Weather {
    Sunny,
    Rainy,
    Cold,
    Hot,
    Snowy,
    Windy,
}

impl Weather {
    pub const ALL: [Weather; 6] = [
        Weather::Sunny,
        Weather::Rainy,
        Weather::Cold,
        Weather::Hot,
        Weather::Snowy,
        Weather::Windy,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Rainy => "rainy",
            Weather::Cold => "cold",
            Weather::Hot => "hot",
            Weather::Snowy => "snowy",
            Weather::Windy => "windy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Sunny => "Sunny",
            Weather::Rainy => "Rainy",
            Weather::Cold => "Cold",
            Weather::Hot => "Hot",
            Weather::Snowy => "Snowy",
            Weather::Windy => "Windy",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Weather::Sunny => "☀️",
            Weather::Rainy => "🌧️",
            Weather::Cold => "🥶",
            Weather::Hot => "🔥",
            Weather::Snowy => "❄️",
            Weather::Windy => "💨",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Accepts either the slug or the display label, case-insensitively.
fn parse_option<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    slug: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Result<T, UnknownOption> {
    let wanted = value.trim();
    all.iter()
        .copied()
        .find(|item| slug(*item).eq_ignore_ascii_case(wanted) || label(*item).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| UnknownOption {
            kind,
            value: value.to_string(),
            expected: all.iter().map(|item| slug(*item)).collect::<Vec<_>>().join(", "),
        })
}

impl FromStr for Occasion {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option("occasion", s, &Occasion::ALL, Occasion::slug, Occasion::label)
    }
}

impl FromStr for Weather {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option("weather", s, &Weather::ALL, Weather::slug, Weather::label)
    }
}

// Forms and JSON go through the same lenient parsing as the CLI.
impl TryFrom<String> for Occasion {
    type Error = UnknownOption;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Weather {
    type Error = UnknownOption;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One catalog entry as the templates and the JSON state endpoint see it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    pub slug: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub selected: bool,
}

pub fn occasion_entries(selected: Option<Occasion>) -> Vec<CatalogEntry> {
    Occasion::ALL
        .iter()
        .map(|o| CatalogEntry {
            slug: o.slug(),
            label: o.label(),
            icon: o.icon(),
            selected: selected == Some(*o),
        })
        .collect()
}

pub fn weather_entries(selected: Option<Weather>) -> Vec<CatalogEntry> {
    Weather::ALL
        .iter()
        .map(|w| CatalogEntry {
            slug: w.slug(),
            label: w.label(),
            icon: w.icon(),
            selected: selected == Some(*w),
        })
        .collect()
}
