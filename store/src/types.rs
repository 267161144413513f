use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Column names of the backing file, in the order they are written.
pub const HEADER: [&str; 7] = [
    "Date",
    "Company",
    "Position",
    "Status",
    "Category",
    "Followed Up",
    "Company Website",
];

/// Marker stored in the "Followed Up" column when no follow-up date is set.
pub const NOT_FOLLOWED_UP: &str = "N/A";

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    #[default]
    Tech,
    Blockchain,
    #[serde(rename = "AI")]
    Ai,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Tech, Category::Blockchain, Category::Ai];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tech => "Tech",
            Category::Blockchain => "Blockchain",
            Category::Ai => "AI",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {0:?} (expected Tech, Blockchain or AI)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts any casing; the canonical spelling is what gets written.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Decoded through [`FromStr`], so the table file and JSON Lines imports
/// accept the same spellings as the command line.
impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One job application.
///
/// Dates are kept as the `YYYY-MM-DD` strings the user entered; the store
/// checks them on every write (see [`crate::validate`]). In the backing
/// file the fields are positional and follow [`HEADER`]; the serde field
/// names below are only used by the JSON Lines interchange format.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub date: String,
    pub company: String,
    pub position: String,
    pub status: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "not_followed_up")]
    pub followed_up: String,
    pub company_website: String,
}

fn not_followed_up() -> String {
    NOT_FOLLOWED_UP.to_string()
}

impl Record {
    /// A record in the `Tech` category with no follow-up date.
    pub fn new(
        date: impl Into<String>,
        company: impl Into<String>,
        position: impl Into<String>,
        status: impl Into<String>,
        company_website: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            company: company.into(),
            position: position.into(),
            status: status.into(),
            category: Category::default(),
            followed_up: not_followed_up(),
            company_website: company_website.into(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_followed_up(mut self, followed_up: impl Into<String>) -> Self {
        self.followed_up = followed_up.into();
        self
    }

    /// True when the follow-up column holds something other than the sentinel.
    pub fn has_follow_up(&self) -> bool {
        !self.followed_up.is_empty() && self.followed_up != NOT_FOLLOWED_UP
    }

    /// Field values in [`HEADER`] order.
    pub fn fields(&self) -> [&str; 7] {
        [
            self.date.as_str(),
            self.company.as_str(),
            self.position.as_str(),
            self.status.as_str(),
            self.category.as_str(),
            self.followed_up.as_str(),
            self.company_website.as_str(),
        ]
    }
}
