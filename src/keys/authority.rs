//! Key roles an account can hold.

use std::fmt;

/// Named authority required to authorize an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authority {
    Owner,
    Active,
    Posting,
    Memo,
}

impl Authority {
    /// All roles, strongest first.
    pub const ALL: [Authority; 4] = [
        Authority::Owner,
        Authority::Active,
        Authority::Posting,
        Authority::Memo,
    ];

    /// Lowercase role name as used by the node API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::Owner => "owner",
            Authority::Active => "active",
            Authority::Posting => "posting",
            Authority::Memo => "memo",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Authority::Posting.to_string(), "posting");
        assert_eq!(Authority::ALL.len(), 4);
    }
}
