//! Which types and members of a library the target may reference.

use crate::assembly::{AssemblyInformation, TypeInformation, Visibility};

const PUBLIC_KEY_MARKER: &str = "publickey=";

/// Per-library member-visibility policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityPolicy {
    /// Non-public types and members are reachable from the target.
    pub include_internals: bool,
}

impl VisibilityPolicy {
    pub const PUBLIC_ONLY: Self = Self {
        include_internals: false,
    };

    pub const WITH_INTERNALS: Self = Self {
        include_internals: true,
    };

    /// Policy for `library` as seen from the target library.
    pub fn for_library(
        library: &dyn AssemblyInformation,
        target_name: Option<&str>,
        target_identity: Option<&str>,
    ) -> Self {
        let Some(target_name) = target_name else {
            return Self::PUBLIC_ONLY;
        };
        if library.name() == target_name {
            return Self::WITH_INTERNALS;
        }
        let identity = target_identity.unwrap_or(target_name);
        let granted = library
            .internals_visible_to()
            .into_iter()
            .any(|declaration| grants_internals(declaration, target_name, identity));
        if granted {
            Self::WITH_INTERNALS
        } else {
            Self::PUBLIC_ONLY
        }
    }

    pub fn allows(self, visibility: Visibility) -> bool {
        visibility.is_public() || (self.include_internals && visibility.is_internal_or_public())
    }

    /// Types registered for markup: never interfaces; abstract classes only
    /// when static (attached-member owners such as `Grid`-style holders).
    pub fn selects_type(self, ty: &dyn TypeInformation) -> bool {
        if ty.is_interface() || ty.name().starts_with('<') {
            return false;
        }
        if ty.is_abstract() && !ty.is_static() {
            return false;
        }
        self.allows(ty.visibility())
    }
}

/// Does an `InternalsVisibleTo` declaration grant access to the target?
///
/// The declaration must start with the target's simple name. When it also
/// names a public key, the target identity's public key must end with it
/// (compared case-insensitively).
pub fn grants_internals(declaration: &str, target_name: &str, target_identity: &str) -> bool {
    if !declaration.starts_with(target_name) {
        return false;
    }
    let Some(required) = public_key(declaration) else {
        return true;
    };
    match public_key(target_identity) {
        Some(actual) => actual
            .to_ascii_lowercase()
            .ends_with(&required.to_ascii_lowercase()),
        None => false,
    }
}

/// Value of a `PublicKey=` component, if any.
fn public_key(identity: &str) -> Option<&str> {
    let lower = identity.to_ascii_lowercase();
    let start = lower.find(PUBLIC_KEY_MARKER)? + PUBLIC_KEY_MARKER.len();
    let rest = &identity[start..];
    let key = rest.split(',').next().unwrap_or(rest).trim();
    (!key.is_empty()).then_some(key)
}
