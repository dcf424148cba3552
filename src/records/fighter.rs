use std::fmt;

/// Canonical identifier for a fighter: the path of their profile page,
/// e.g. `/fighter/Jon-Jones-27944`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FighterId(String);

impl FighterId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FighterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Biographical row for one fighter. First write wins; never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FighterRecord {
    pub id: FighterId,
    pub weight_class: Option<String>,
    pub birth_date: Option<String>,
}

impl FighterRecord {
    /// Builds a record, trimming values and treating blank ones as absent
    pub fn new(id: FighterId, weight_class: Option<String>, birth_date: Option<String>) -> Self {
        Self {
            id,
            weight_class: non_blank(weight_class),
            birth_date: non_blank(birth_date),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
