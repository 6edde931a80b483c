//! The resolver context shared by locators and accessors

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use veneer_sdk::{HostRuntime, RawMemory, TypeHandle};

use crate::config::{ReflectConfig, Versioning};
use crate::error::{ReflectError, ReflectResult};
use crate::locator::SymbolLocator;
use crate::probe::{root_is_versioned, version_token, SchemeProbe, StandardProbe};
use crate::scheme::NamingScheme;

/// Owns the host, the configuration and every per-process cache.
///
/// The naming scheme (host-wide and per namespace), the version token and
/// the privileged memory handle are each computed at most once, on first
/// use, and published through write-once cells. Concurrent first use is safe: one caller computes,
/// the others observe its result.
pub struct Reflector {
    host: Arc<dyn HostRuntime>,
    config: ReflectConfig,
    probe: Box<dyn SchemeProbe>,
    scheme: OnceCell<NamingScheme>,
    namespace_schemes: HashMap<String, OnceCell<NamingScheme>>,
    version: OnceCell<Option<String>>,
    memory: OnceCell<Option<Arc<dyn RawMemory>>>,
}

impl fmt::Debug for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("scheme", &self.scheme.get())
            .field("version", &self.version.get())
            .field("memory", &self.memory.get().map(Option::is_some))
            .finish_non_exhaustive()
    }
}

impl Reflector {
    /// Create a reflector using the standard probe from `config.probe`
    pub fn new(host: Arc<dyn HostRuntime>, config: ReflectConfig) -> Arc<Self> {
        let probe = StandardProbe::new(config.probe.clone());
        Self::with_probe(host, config, probe)
    }

    /// Create a reflector with a custom naming-scheme probe
    pub fn with_probe(
        host: Arc<dyn HostRuntime>,
        config: ReflectConfig,
        probe: impl SchemeProbe + 'static,
    ) -> Arc<Self> {
        let namespace_schemes = config
            .namespaces
            .keys()
            .map(|name| (name.clone(), OnceCell::new()))
            .collect();
        Arc::new(Self {
            host,
            config,
            probe: Box::new(probe),
            scheme: OnceCell::new(),
            namespace_schemes,
            version: OnceCell::new(),
            memory: OnceCell::new(),
        })
    }

    /// The host runtime
    pub fn host(&self) -> &dyn HostRuntime {
        self.host.as_ref()
    }

    /// The configuration
    pub fn config(&self) -> &ReflectConfig {
        &self.config
    }

    /// Naming scheme of the host, detected on first call
    pub fn detect_scheme(&self) -> NamingScheme {
        *self.scheme.get_or_init(|| {
            let scheme = self
                .probe
                .detect(self.host(), &self.config.layout, self.host_version());
            tracing::debug!(%scheme, version = ?self.host_version(), "detected naming scheme");
            scheme
        })
    }

    /// Naming scheme of one namespace, decided on first call.
    ///
    /// `Versioning::Probe` namespaces follow `detect_scheme`. `RootDepth`
    /// namespaces are legacy when the root package is deep enough to carry
    /// a version token, modern otherwise.
    pub fn namespace_scheme(&self, name: &str) -> ReflectResult<NamingScheme> {
        let (Some(namespace), Some(cell)) = (self.config.namespace(name), self.namespace_schemes.get(name)) else {
            return Err(ReflectError::UnknownNamespace(name.to_string()));
        };
        Ok(*cell.get_or_init(|| {
            let scheme = match namespace.versioning {
                Versioning::Probe => self.detect_scheme(),
                Versioning::RootDepth => {
                    let root = self.host.root_type_path();
                    if root_is_versioned(&root, &self.config.layout, self.config.probe.depth_threshold) {
                        NamingScheme::Legacy
                    } else {
                        NamingScheme::Modern
                    }
                }
            };
            tracing::debug!(namespace = name, %scheme, "namespace naming scheme");
            scheme
        }))
    }

    /// Host version token from the root type path, if it carries one
    pub fn host_version(&self) -> Option<&str> {
        self.version
            .get_or_init(|| version_token(&self.host.root_type_path(), &self.config.layout))
            .as_deref()
    }

    /// Privileged memory capability, acquired on first call.
    ///
    /// A failed acquisition is cached too; the host is asked only once.
    pub fn raw_memory(&self) -> Option<Arc<dyn RawMemory>> {
        self.memory
            .get_or_init(|| match self.host.raw_memory() {
                Ok(memory) => Some(memory),
                Err(err) => {
                    tracing::warn!(%err, "privileged memory unavailable; readonly fields stay read-only");
                    None
                }
            })
            .clone()
    }

    /// Human-readable name of a type, for diagnostics
    pub fn type_label(&self, ty: TypeHandle) -> String {
        self.host.type_name(ty).unwrap_or_else(|| ty.to_string())
    }

    // ========================================================================
    // Locators
    // ========================================================================

    /// Locate `name` relative to a configured namespace
    pub fn locate(self: &Arc<Self>, namespace: &str, name: &str) -> SymbolLocator {
        SymbolLocator::named(self.clone(), Some(namespace.to_string()), name.to_string())
    }

    /// Locate an already fully-qualified `name`
    pub fn locate_global(self: &Arc<Self>, name: &str) -> SymbolLocator {
        SymbolLocator::named(self.clone(), None, name.to_string())
    }

    /// Wrap a live handle so it can feed the accessor API
    pub fn bind(self: &Arc<Self>, handle: TypeHandle) -> SymbolLocator {
        SymbolLocator::bound(self.clone(), Some(handle))
    }

    /// Wrap an optional handle; `None` yields a locator that never resolves
    pub fn bind_opt(self: &Arc<Self>, handle: Option<TypeHandle>) -> SymbolLocator {
        SymbolLocator::bound(self.clone(), handle)
    }
}
