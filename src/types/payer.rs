use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the partner organisation that granted a batch of points.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payer(String);

impl Payer {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Payer {
    fn from(name: &str) -> Self {
        Payer(name.to_string())
    }
}

impl From<String> for Payer {
    fn from(name: String) -> Self {
        Payer(name)
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
