//! Static reference records: health schemes and the hospital directory.

use serde::{Deserialize, Serialize};

/// Display language for bilingual text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Punjabi,
}

impl Language {
    /// BCP 47 locale passed to speech engines.
    pub fn locale(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Punjabi => "pa-IN",
        }
    }

    /// Parse a short code ("en", "pa").
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" | "en-us" => Some(Language::English),
            "pa" | "pa-in" => Some(Language::Punjabi),
            _ => None,
        }
    }
}

/// Scheme category tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SchemeCategory {
    Maternal,
    Child,
    General,
    Insurance,
    Preventive,
}

/// A government health scheme. Loaded once, never mutated.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HealthScheme {
    pub id: &'static str,
    pub name: &'static str,
    pub name_pa: &'static str,
    pub description: &'static str,
    pub description_pa: &'static str,
    pub eligibility: &'static str,
    pub eligibility_pa: &'static str,
    pub benefits: &'static str,
    pub benefits_pa: &'static str,
    pub category: SchemeCategory,
}

impl HealthScheme {
    pub fn name_in(&self, language: Language) -> &'static str {
        match language {
            Language::English => self.name,
            Language::Punjabi => self.name_pa,
        }
    }

    pub fn description_in(&self, language: Language) -> &'static str {
        match language {
            Language::English => self.description,
            Language::Punjabi => self.description_pa,
        }
    }
}

/// Facility tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HospitalType {
    /// Civil hospital
    CH,
    /// Primary health centre
    PHC,
    /// Community health centre
    CHC,
}

/// A directory entry for a nearby facility.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Hospital {
    pub id: &'static str,
    pub name: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub hospital_type: HospitalType,
    pub location: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("pa"), Some(Language::Punjabi));
        assert_eq!(Language::from_code("EN"), Some(Language::English));
        assert_eq!(Language::from_code("hi"), None);
        assert_eq!(Language::Punjabi.locale(), "pa-IN");
    }
}
