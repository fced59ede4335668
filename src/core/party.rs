use serde::{Deserialize, Serialize};

/// Kind of party that can own an account or perform a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    /// An individual member
    Member,
    /// A savings group
    Group,
}

impl PartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Group => "group",
        }
    }
}

impl std::fmt::Display for PartyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for PartyKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "member" => Ok(Self::Member),
            "group" => Ok(Self::Group),
            _ => Err(format!("Invalid party kind: {}", value)),
        }
    }
}

/// Tagged reference to a member or group.
///
/// Ownership is always explicit: an account or transaction names the kind
/// of its owner alongside the id, so callers never have to guess which
/// foreign key applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyRef {
    pub kind: PartyKind,
    pub id: String,
}

impl PartyRef {
    pub fn member(id: impl Into<String>) -> Self {
        Self {
            kind: PartyKind::Member,
            id: id.into(),
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self {
            kind: PartyKind::Group,
            id: id.into(),
        }
    }

    pub fn is_member(&self) -> bool {
        self.kind == PartyKind::Member
    }

    pub fn is_group(&self) -> bool {
        self.kind == PartyKind::Group
    }
}

impl std::fmt::Display for PartyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
