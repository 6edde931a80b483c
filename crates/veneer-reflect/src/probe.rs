//! Naming-scheme detection
//!
//! Detection is a swappable strategy: the engine only asks a `SchemeProbe`
//! for an answer once per `Reflector` and caches it. Host-specific knowledge
//! (which type exists only under the legacy scheme, how deep a versioned
//! package is) lives in `ProbeConfig`, not here.

use veneer_sdk::HostRuntime;

use crate::config::{LayoutConfig, ProbeConfig, VERSION_PLACEHOLDER};
use crate::scheme::NamingScheme;

/// Strategy that decides which naming scheme the host uses
pub trait SchemeProbe: Send + Sync {
    /// Inspect the host. `version` is the token extracted from the root type path.
    fn detect(&self, host: &dyn HostRuntime, layout: &LayoutConfig, version: Option<&str>) -> NamingScheme;
}

/// Probe driven by `ProbeConfig`.
///
/// 1. If a legacy probe type is configured and the version token is known,
///    try to resolve it. Success means `Legacy`.
/// 2. Otherwise a root package deeper than `depth_threshold` means `Modern`,
///    anything shallower means `Unscoped`.
#[derive(Debug, Clone, Default)]
pub struct StandardProbe {
    config: ProbeConfig,
}

impl StandardProbe {
    /// Create from probe configuration
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }
}

impl SchemeProbe for StandardProbe {
    fn detect(&self, host: &dyn HostRuntime, layout: &LayoutConfig, version: Option<&str>) -> NamingScheme {
        if let (Some(template), Some(version)) = (self.config.legacy_type.as_deref(), version) {
            let candidate = template.replace(VERSION_PLACEHOLDER, version);
            if host.find_type(&candidate).is_some() {
                tracing::debug!(probe = %candidate, "legacy probe type resolved");
                return NamingScheme::Legacy;
            }
            tracing::trace!(probe = %candidate, "legacy probe type absent");
        }

        if root_is_versioned(&host.root_type_path(), layout, self.config.depth_threshold) {
            NamingScheme::Modern
        } else {
            NamingScheme::Unscoped
        }
    }
}

/// Probe that always answers the same scheme, for callers that already know
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub NamingScheme);

impl SchemeProbe for FixedProbe {
    fn detect(&self, _host: &dyn HostRuntime, _layout: &LayoutConfig, _version: Option<&str>) -> NamingScheme {
        self.0
    }
}

/// Package segments of a fully-qualified type name (the name minus its last segment)
pub fn package_segments<'a>(qualified: &'a str, separator: &str) -> Vec<&'a str> {
    let mut segments: Vec<&str> = qualified.split(separator).filter(|s| !s.is_empty()).collect();
    segments.pop();
    segments
}

/// Whether the root type's package is deeper than `threshold` segments
pub fn root_is_versioned(root_type_path: &str, layout: &LayoutConfig, threshold: usize) -> bool {
    package_segments(root_type_path, &layout.separator).len() > threshold
}

/// Version token of the host: the package segment at `layout.version_segment`
pub fn version_token(root_type_path: &str, layout: &LayoutConfig) -> Option<String> {
    package_segments(root_type_path, &layout.separator)
        .get(layout.version_segment)
        .map(|s| s.to_string())
}
