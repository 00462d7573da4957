use std::fmt;

/// Label the recognition service uses for "no match".
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Who a face belongs to, as far as the recognition service knows.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentityLabel {
    Known(String),
    Unknown,
}

impl IdentityLabel {
    /// Maps the service's `name` field. A missing, blank, or literal
    /// "Unknown" name means no match.
    pub fn from_server(name: Option<String>) -> Self {
        match name {
            Some(name) if !name.trim().is_empty() && name != UNKNOWN_LABEL => {
                IdentityLabel::Known(name)
            }
            _ => IdentityLabel::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, IdentityLabel::Known(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            IdentityLabel::Known(name) => name,
            IdentityLabel::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for IdentityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
