use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::QueryError;

const FENCE: &str = "```";

static TAGGED_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```sql").expect("fence pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A non-empty SQL statement with no code fences and no trailing terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSql(String);

impl SanitizedSql {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SanitizedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedSql {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Cleans raw model output into something the database can run.
///
/// Removes code fences, collapses whitespace and drops the trailing `;`.
/// Applying it to its own output is a no-op.
pub fn sanitize(raw: &str) -> Result<SanitizedSql, QueryError> {
    let mut text = raw.to_string();
    // Removing one fence can splice stray backticks into another.
    while text.contains(FENCE) {
        text = TAGGED_FENCE.replace_all(&text, "").replace(FENCE, "");
    }

    let collapsed = WHITESPACE.replace_all(&text, " ");
    let sql = collapsed.trim().trim_end_matches([';', ' ']);

    if sql.is_empty() {
        return Err(QueryError::EmptyTranslation);
    }
    Ok(SanitizedSql(sql.to_string()))
}
