use std::fmt;

/// Machine-readable error codes shared by the library and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    RootNotFound,
    ConfigParseError,
    MalformedInput,
    CorruptSnapshot,
    Disconnected,
    InputUnreadable,
    OutputWriteFailed,
    NoCommonAncestor,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RootNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::MalformedInput => "E2001",
            Self::CorruptSnapshot => "E2002",
            Self::Disconnected => "E3001",
            Self::InputUnreadable => "E5001",
            Self::OutputWriteFailed => "E5002",
            Self::NoCommonAncestor => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::RootNotFound => "Root category not present in dataset",
            Self::ConfigParseError => "Config file parse error",
            Self::MalformedInput => "Malformed input row",
            Self::CorruptSnapshot => "Persisted hierarchy is inconsistent",
            Self::Disconnected => "Category not connected to root",
            Self::InputUnreadable => "Input file could not be read",
            Self::OutputWriteFailed => "Output file write failed",
            Self::NoCommonAncestor => "Root paths share no category",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::RootNotFound => {
                Some("Pick a root that appears as a category in the edge table (`--root`).")
            }
            Self::ConfigParseError => Some("Fix syntax in taxon.toml and retry."),
            Self::MalformedInput => {
                Some("Every data row needs non-empty `item` and `category` columns.")
            }
            Self::CorruptSnapshot => Some("Run `tx build` to regenerate the DAG and depth tables."),
            Self::Disconnected => None,
            Self::InputUnreadable => Some("Check the path and read permissions."),
            Self::OutputWriteFailed => Some("Check disk space and write permissions."),
            Self::NoCommonAncestor => Some("Rebuild the hierarchy. If persistent, report a bug."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
