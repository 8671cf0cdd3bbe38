//! Shared types for the DPS triage system.
//!
//! This crate defines the triage severity categories used across the
//! workspace, together with small validated text types. It deliberately has
//! no knowledge of storage or presentation.

/// Errors that can occur when parsing a triage category from its wire label.
#[derive(Debug, thiserror::Error)]
pub enum TriageParseError {
    /// The label did not match any known triage category.
    #[error("unknown triage category: {0}")]
    Unknown(String),
}

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Triage severity category assigned to a patient at the first-aid post.
///
/// The ordering of the variants is clinical priority: absolute emergencies
/// first, then relative emergencies, then light care, then deceased.
/// Untriaged patients (no category yet) sort after all of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriageCategory {
    /// Urgence absolue — absolute emergency.
    Ua,
    /// Urgence relative — relative emergency.
    Ur,
    /// Urgence impliquée — light care.
    Uimp,
    /// Décédé — deceased.
    Deceased,
}

impl TriageCategory {
    /// Wire label stored on the patient record.
    pub fn as_str(self) -> &'static str {
        match self {
            TriageCategory::Ua => "UA",
            TriageCategory::Ur => "UR",
            TriageCategory::Uimp => "UIMP",
            TriageCategory::Deceased => "DCD",
        }
    }

    /// Sort rank within the active triage list. Lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            TriageCategory::Ua => 0,
            TriageCategory::Ur => 1,
            TriageCategory::Uimp => 2,
            TriageCategory::Deceased => 3,
        }
    }
}

/// Sort rank for an optional triage status; untriaged patients rank last.
pub fn severity_rank(category: Option<TriageCategory>) -> u8 {
    category.map(TriageCategory::rank).unwrap_or(4)
}

impl std::str::FromStr for TriageCategory {
    type Err = TriageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UA" => Ok(TriageCategory::Ua),
            "UR" => Ok(TriageCategory::Ur),
            "UIMP" => Ok(TriageCategory::Uimp),
            "DCD" => Ok(TriageCategory::Deceased),
            other => Err(TriageParseError::Unknown(other.to_string())),
        }
    }
}

impl std::fmt::Display for TriageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for TriageCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for TriageCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A race bib (dossard) number that is guaranteed non-empty.
///
/// The patient record stores the bib as plain text because some events hand
/// out alphanumeric bibs; this type only enforces that a bib, where one is
/// required, actually carries content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibNumber(String);

impl BibNumber {
    /// Creates a new `BibNumber` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the
    /// trimmed result is empty, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BibNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BibNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_labels_case_insensitively() {
        assert_eq!("UA".parse::<TriageCategory>().unwrap(), TriageCategory::Ua);
        assert_eq!(
            "uimp".parse::<TriageCategory>().unwrap(),
            TriageCategory::Uimp
        );
        assert_eq!(
            " dcd ".parse::<TriageCategory>().unwrap(),
            TriageCategory::Deceased
        );
    }

    #[test]
    fn rejects_unknown_label() {
        let err = "P3".parse::<TriageCategory>().unwrap_err();
        assert!(matches!(err, TriageParseError::Unknown(_)));
    }

    #[test]
    fn severity_ranks_in_clinical_priority_order() {
        assert!(severity_rank(Some(TriageCategory::Ua)) < severity_rank(Some(TriageCategory::Ur)));
        assert!(
            severity_rank(Some(TriageCategory::Ur)) < severity_rank(Some(TriageCategory::Uimp))
        );
        assert!(
            severity_rank(Some(TriageCategory::Uimp))
                < severity_rank(Some(TriageCategory::Deceased))
        );
        assert!(severity_rank(Some(TriageCategory::Deceased)) < severity_rank(None));
    }

    #[test]
    fn bib_number_trims_and_rejects_empty() {
        assert_eq!(BibNumber::new(" 42 ").unwrap().as_str(), "42");
        assert!(matches!(BibNumber::new("   "), Err(TextError::Empty)));
    }
}
