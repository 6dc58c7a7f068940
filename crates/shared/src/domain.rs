use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(TestRunId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Language::Ar
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported language '{0}', expected 'en' or 'ar'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Picks the Arabic text when the active language is Arabic and the Arabic
/// field carries something, otherwise the English text.
pub fn localize<'a>(language: Language, en: &'a str, ar: Option<&'a str>) -> &'a str {
    match (language, ar) {
        (Language::Ar, Some(ar)) if !ar.is_empty() => ar,
        _ => en,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneRole {
    Dominant,
    Secondary,
    Support,
}

impl GeneRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "dominant" => Some(GeneRole::Dominant),
            "secondary" => Some(GeneRole::Secondary),
            "support" => Some(GeneRole::Support),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationChannel {
    Behavior,
    Reflection,
    Social,
}

impl ActivationChannel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "behavior" => Some(ActivationChannel::Behavior),
            "reflection" => Some(ActivationChannel::Reflection),
            "social" => Some(ActivationChannel::Social),
            _ => None,
        }
    }
}
