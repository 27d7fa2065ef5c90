use serde::{Serialize, Deserialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// education level (jenjang) that records and restricted roles are tagged with
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    AsRefStr, EnumIter,
    Serialize, Deserialize
)]
pub enum Level {
    #[serde(rename = "PG-TK")]
    #[strum(serialize = "PG-TK")]
    PgTk,
    #[serde(rename = "SD")]
    #[strum(serialize = "SD")]
    Sd,
    #[serde(rename = "SMP")]
    #[strum(serialize = "SMP")]
    Smp,
    #[serde(rename = "SMA")]
    #[strum(serialize = "SMA")]
    Sma,
}

impl Level {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// normalized tags a record tag is matched against for this level.
    ///
    /// kindergarten records show up as "PG-TK", "PGTK", "TK" and "KB/TK"
    /// depending on who entered them so the shorter tag is included.
    pub fn scope_tags(&self) -> &'static [&'static str] {
        match self {
            Level::PgTk => &["PGTK", "TK"],
            Level::Sd => &["SD"],
            Level::Smp => &["SMP"],
            Level::Sma => &["SMA"],
        }
    }

    /// attempts to resolve a free form level tag
    pub fn from_tag(given: &str) -> Option<Self> {
        let normalized = normalize_tag(given);

        if normalized.is_empty() {
            return None;
        }

        // exact matches first so "SMP" never resolves through a shorter tag
        for level in Level::iter() {
            if normalize_tag(level.as_str()) == normalized {
                return Some(level);
            }
        }

        for level in Level::iter() {
            for tag in level.scope_tags() {
                if normalized == *tag {
                    return Some(level);
                }
            }
        }

        None
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// uppercases the tag and drops anything that is not alphanumeric so
/// "pg-tk", "PG TK" and "PGTK" all compare the same
pub fn normalize_tag(given: &str) -> String {
    let mut rtn = String::with_capacity(given.len());

    for ch in given.chars() {
        if ch.is_alphanumeric() {
            rtn.extend(ch.to_uppercase());
        }
    }

    rtn
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_variants() {
        let cases = [
            ("PG-TK", "PGTK"),
            ("pg tk", "PGTK"),
            ("PGTK", "PGTK"),
            (" sd ", "SD"),
            ("Smp", "SMP"),
            ("", ""),
            ("--", ""),
        ];

        for (given, expected) in cases {
            assert_eq!(normalize_tag(given), expected, "given {:?}", given);
        }
    }

    #[test]
    fn level_from_tag() {
        let cases = [
            ("PG-TK", Some(Level::PgTk)),
            ("tk", Some(Level::PgTk)),
            ("SD", Some(Level::Sd)),
            ("smp", Some(Level::Smp)),
            ("S M A", Some(Level::Sma)),
            ("SMK", None),
            ("", None),
        ];

        for (given, expected) in cases {
            assert_eq!(Level::from_tag(given), expected, "given {:?}", given);
        }
    }

    #[test]
    fn serde_uses_display_tags() {
        let json = serde_json::to_string(&Level::PgTk).unwrap();
        assert_eq!(json, "\"PG-TK\"");

        let level: Level = serde_json::from_str("\"SMA\"").unwrap();
        assert_eq!(level, Level::Sma);
    }
}
