use std::collections::BTreeSet;

use crate::level::normalize_tag;
use crate::sec::role::Role;

/// the set of level tags a role is allowed to work with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Tags(BTreeSet<String>),
}

impl Scope {
    /// the empty scope. unknown roles land here and can touch nothing
    pub fn none() -> Self {
        Scope::Tags(BTreeSet::new())
    }

    pub fn for_role(role: &Role) -> Self {
        if role.is_unrestricted() {
            return Scope::All;
        }

        let mut tags = BTreeSet::new();

        if let Some(level) = role.level() {
            for tag in level.scope_tags() {
                tags.insert((*tag).to_owned());
            }
        }

        Scope::Tags(tags)
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Scope::All)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Scope::All => false,
            Scope::Tags(tags) => tags.is_empty(),
        }
    }

    /// checks a record tag against the scope.
    ///
    /// the record tag is normalized and must contain one of the scope tags,
    /// so "PG-TK", "PGTK" and "TK" all land in the kindergarten scope. an
    /// empty tag never matches a restricted scope.
    pub fn permits(&self, tag: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Tags(tags) => {
                let normalized = normalize_tag(tag);

                if normalized.is_empty() {
                    return false;
                }

                tags.iter().any(|allowed| normalized.contains(allowed.as_str()))
            }
        }
    }

    /// the controls available for a record carrying the given tag. records
    /// without a level tag are shared across levels and only unrestricted
    /// roles may change them.
    pub fn access(&self, tag: Option<&str>) -> Access {
        let tag = tag.filter(|t| !t.trim().is_empty());

        match tag {
            Some(tag) => if self.permits(tag) {
                Access::FULL
            } else {
                Access::DENIED
            },
            None => if self.is_unrestricted() {
                Access::FULL
            } else {
                Access::READ_ONLY
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Access {
    pub const FULL: Access = Access { view: true, edit: true, delete: true };
    pub const READ_ONLY: Access = Access { view: true, edit: false, delete: false };
    pub const DENIED: Access = Access { view: false, edit: false, delete: false };
}

pub fn allowed_scopes(role: &str) -> Scope {
    match Role::parse(role) {
        Some(known) => Scope::for_role(&known),
        None => Scope::none(),
    }
}

pub fn can_access(role: &str, tag: &str) -> bool {
    allowed_scopes(role).permits(tag)
}
