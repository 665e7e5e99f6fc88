//! Display locale for month names and due-date text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

const MONTHS_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Locale {
    /// Capitalized month name for a 1-based month number.
    pub fn month_name(&self, month: u32) -> Option<&'static str> {
        let idx = usize::try_from(month).ok()?.checked_sub(1)?;
        match self {
            Locale::Es => MONTHS_ES.get(idx).copied(),
            Locale::En => MONTHS_EN.get(idx).copied(),
        }
    }

    /// Label of the bucket for tasks without a usable due date.
    pub fn unspecified_label(&self) -> &'static str {
        match self {
            Locale::Es => "Sin fecha",
            Locale::En => "No date",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        // Accept region-qualified tags such as es-CL or en_US.
        let lang = lower.split(['-', '_']).next().unwrap_or_default();
        match lang {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            _ => Err(ConfigError::InvalidValue {
                key: "locale.default_locale".to_string(),
                message: format!("unsupported locale '{s}'"),
            }),
        }
    }
}
