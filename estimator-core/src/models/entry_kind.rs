use serde::{Deserialize, Serialize};

/// Which catalog table an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Service,
    Amount,
    Location,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [Self::Service, Self::Amount, Self::Location];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Amount => "amount",
            Self::Location => "location",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "service" => Some(Self::Service),
            "amount" => Some(Self::Amount),
            "location" => Some(Self::Location),
            _ => None,
        }
    }

    /// Name of the numeric attribute carried by entries of this kind.
    pub fn value_name(&self) -> &'static str {
        match self {
            Self::Service => "base price",
            Self::Amount => "multiplier",
            Self::Location => "fee",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
