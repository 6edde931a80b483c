//! Naming schemes and qualified-name composition

use std::fmt;

use crate::config::NamespaceConfig;

/// How the host builds the qualified names of its internal types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingScheme {
    /// Names carry the host version token as a synthetic path segment
    Legacy,
    /// Callers supply the full sub-path below the namespace prefix
    Modern,
    /// No versioned packages anywhere; namespaced names sit directly below the prefix
    Unscoped,
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamingScheme::Legacy => "legacy",
            NamingScheme::Modern => "modern",
            NamingScheme::Unscoped => "unscoped",
        })
    }
}

/// Compose the fully-qualified name for `relative`.
///
/// - no namespace: `relative` unchanged
/// - `Modern` or `Unscoped`: `prefix.relative`
/// - `Legacy`: `prefix[.infix].version.relative`
///
/// Returns `None` only under `Legacy` without a version token.
pub fn qualify(
    scheme: NamingScheme,
    namespace: Option<&NamespaceConfig>,
    version: Option<&str>,
    relative: &str,
    separator: &str,
) -> Option<String> {
    let Some(namespace) = namespace else {
        return Some(relative.to_string());
    };

    let mut segments: Vec<&str> = Vec::with_capacity(4);
    match scheme {
        NamingScheme::Modern | NamingScheme::Unscoped => segments.push(&namespace.prefix),
        NamingScheme::Legacy => {
            segments.push(&namespace.prefix);
            if let Some(infix) = namespace.legacy_infix.as_deref() {
                segments.push(infix);
            }
            segments.push(version?);
        }
    }
    segments.push(relative);
    Some(segments.join(separator))
}
