use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Attach the release version and move tickets to Done.
    Release,
    /// Move tickets to the released-on-staging state.
    Verify,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Release, Operation::Verify];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Release => "release",
            Operation::Verify => "verify",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_operations() {
        assert_eq!("release".parse::<Operation>().unwrap(), Operation::Release);
        assert_eq!("verify".parse::<Operation>().unwrap(), Operation::Verify);
    }

    #[test]
    fn rejects_unknown_operation() {
        let err = "deploy".parse::<Operation>().unwrap_err();
        assert!(matches!(err, Error::UnknownOperation(ref s) if s == "deploy"));
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("Release".parse::<Operation>().is_err());
    }
}
