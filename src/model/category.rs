use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed top-level classification codes partitioning the root tree.
///
/// Declaration order matches the lexical order of the codes, so the derived
/// `Ord` agrees with the scan comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "EI")]
    Ei,
    #[serde(rename = "SCP")]
    Scp,
    #[serde(rename = "SER")]
    Ser,
    #[serde(rename = "WO")]
    Wo,
}

impl Category {
    /// All categories, in scan order.
    pub const ALL: [Category; 4] = [Category::Ei, Category::Scp, Category::Ser, Category::Wo];

    /// The root directory name for this category.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Ei => "EI",
            Category::Scp => "SCP",
            Category::Ser => "SER",
            Category::Wo => "WO",
        }
    }

    /// Parse a category code, case-insensitively.
    pub fn parse_code(s: &str) -> Option<Category> {
        match s.to_ascii_uppercase().as_str() {
            "EI" => Some(Category::Ei),
            "SCP" => Some(Category::Scp),
            "SER" => Some(Category::Ser),
            "WO" => Some(Category::Wo),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
