use crate::level::{Level, normalize_tag};

pub const MAX_ROLE_CHARS: usize = 64;

/// canonical staff role.
///
/// the backend hands out roles in two vocabularies: human readable titles
/// ("Kepala Sekolah SD", "Admin SMP") and short codes ("superadmin",
/// "kepsek_sd", "admin_sma"). both parse into the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    SuperAdmin,
    Admin,
    Principal(Level),
    LevelAdmin(Level),
}

const PRINCIPAL_PREFIXES: [&str; 2] = ["KEPALASEKOLAH", "KEPSEK"];
const LEVEL_ADMIN_PREFIXES: [&str; 2] = ["ADMIN", "OPERATOR"];

impl Role {
    pub fn parse(given: &str) -> Option<Self> {
        if given.chars().count() > MAX_ROLE_CHARS {
            return None;
        }

        let compact = normalize_tag(given);

        match compact.as_str() {
            "" => return None,
            "SUPERADMIN" => return Some(Role::SuperAdmin),
            "ADMIN" | "ADMINISTRATOR" => return Some(Role::Admin),
            _ => {}
        }

        for prefix in PRINCIPAL_PREFIXES {
            if let Some(rest) = compact.strip_prefix(prefix) {
                return Level::from_tag(rest).map(Role::Principal);
            }
        }

        for prefix in LEVEL_ADMIN_PREFIXES {
            if let Some(rest) = compact.strip_prefix(prefix) {
                return Level::from_tag(rest).map(Role::LevelAdmin);
            }
        }

        None
    }

    /// roles that see and edit every record regardless of level
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    pub fn level(&self) -> Option<Level> {
        match self {
            Role::Principal(level) |
            Role::LevelAdmin(level) => Some(*level),
            Role::SuperAdmin |
            Role::Admin => None,
        }
    }

    pub fn code(&self) -> String {
        match self {
            Role::SuperAdmin => "superadmin".into(),
            Role::Admin => "admin".into(),
            Role::Principal(level) => format!(
                "kepsek_{}", normalize_tag(level.as_str()).to_lowercase()
            ),
            Role::LevelAdmin(level) => format!(
                "admin_{}", normalize_tag(level.as_str()).to_lowercase()
            ),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Role::SuperAdmin => "Super Admin".into(),
            Role::Admin => "Admin".into(),
            Role::Principal(level) => format!("Kepala Sekolah {}", level),
            Role::LevelAdmin(level) => format!("Admin {}", level),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role \"{0}\"")]
pub struct UnknownRole(pub String);
