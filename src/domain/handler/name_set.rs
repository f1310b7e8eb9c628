//! The action names a handler entry answers to.

/// Name set that matches any action nobody else claimed.
pub const WILDCARD: &str = "?";

/// Action the engine runs after a failure, when the handler declares it.
pub const ON_ERROR: &str = "onError";

/// Either an explicit list of action names or the wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSet {
    Names(Vec<String>),
    Wildcard,
}

impl NameSet {
    /// Parses `"?"` as the wildcard and anything else as comma-separated
    /// names. Whitespace around names is ignored.
    pub fn parse(spec: &str) -> Self {
        if spec.trim() == WILDCARD {
            return NameSet::Wildcard;
        }
        NameSet::Names(
            spec.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Exact membership; the wildcard contains no names.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            NameSet::Names(names) => names.iter().any(|n| n == name),
            NameSet::Wildcard => false,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, NameSet::Wildcard)
    }
}

impl From<&str> for NameSet {
    fn from(spec: &str) -> Self {
        NameSet::parse(spec)
    }
}

impl From<String> for NameSet {
    fn from(spec: String) -> Self {
        NameSet::parse(&spec)
    }
}

impl From<&[&str]> for NameSet {
    fn from(names: &[&str]) -> Self {
        NameSet::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NameSet {
    fn from(names: [&str; N]) -> Self {
        NameSet::from(&names[..])
    }
}
