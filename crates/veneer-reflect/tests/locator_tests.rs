//! Integration tests for type location and scheme-aware name composition

mod common;

use std::sync::Arc;

use common::{config, fixture, LEGACY_ROOT};
use veneer_host::MemoryHost;
use veneer_reflect::{FixedProbe, NamingScheme, ReflectConfig, ReflectError, Reflector, SymbolKind};
use veneer_sdk::HostRuntime;

#[test]
fn test_locate_legacy_namespaces() {
    let fx = fixture();
    let player = fx.reflector.locate("nms", "EntityPlayer");
    assert_eq!(
        player.qualified_name().unwrap(),
        "net.minecraft.server.v1_8_R3.EntityPlayer"
    );
    assert_eq!(player.resolve(), Some(fx.player));

    let world = fx.reflector.locate("obc", "CraftWorld");
    assert_eq!(
        world.qualified_name().unwrap(),
        "org.bukkit.craftbukkit.v1_8_R3.CraftWorld"
    );
    assert!(world.is_present());
}

#[test]
fn test_locate_global() {
    let fx = fixture();
    let entity = fx.reflector.locate_global("net.minecraft.server.v1_8_R3.Entity");
    assert_eq!(entity.resolve(), Some(fx.entity));
    assert_eq!(entity.descriptor(), Some("net.minecraft.server.v1_8_R3.Entity"));
}

#[test]
fn test_resolves_once() {
    let fx = fixture();
    fx.reflector.detect_scheme();
    let before = fx.host.stats().type_lookups;

    let player = fx.reflector.locate("nms", "EntityPlayer");
    for _ in 0..5 {
        assert_eq!(player.resolve(), Some(fx.player));
    }
    let clone = player.clone();
    assert_eq!(clone.resolve(), Some(fx.player));

    assert_eq!(fx.host.stats().type_lookups - before, 1);
}

#[test]
fn test_failed_resolution_is_cached() {
    let fx = fixture();
    fx.reflector.detect_scheme();
    let before = fx.host.stats().type_lookups;

    let missing = fx.reflector.locate("nms", "PlayerConnection").quiet();
    assert_eq!(missing.resolve(), None);
    assert_eq!(missing.resolve(), None);
    assert!(!missing.is_present());

    assert_eq!(fx.host.stats().type_lookups - before, 1);
    assert_eq!(
        missing.try_resolve(),
        Err(ReflectError::not_found(
            SymbolKind::Type,
            "net.minecraft.server.v1_8_R3.PlayerConnection"
        ))
    );
}

#[test]
fn test_unknown_namespace() {
    let fx = fixture();
    let locator = fx.reflector.locate("mojang", "Entity");
    assert_eq!(
        locator.qualified_name(),
        Err(ReflectError::UnknownNamespace("mojang".to_string()))
    );
    assert_eq!(locator.resolve(), None);
}

#[test]
fn test_bound_locators() {
    let fx = fixture();
    let bound = fx.reflector.bind(fx.entity);
    assert_eq!(bound.resolve(), Some(fx.entity));
    assert_eq!(bound.descriptor(), None);

    let absent = fx.reflector.bind_opt(None);
    assert_eq!(absent.resolve(), None);
    assert!(absent.qualified_name().is_err());
}

#[test]
fn test_resolve_all() {
    let fx = fixture();
    let present = [
        fx.reflector.locate("nms", "Entity"),
        fx.reflector.locate("nms", "EntityPlayer"),
    ];
    assert_eq!(
        veneer_reflect::SymbolLocator::resolve_all(&present),
        Some(vec![fx.entity, fx.player])
    );

    let partial = [
        fx.reflector.locate("nms", "Entity"),
        fx.reflector.locate("nms", "Missing").quiet(),
    ];
    assert_eq!(veneer_reflect::SymbolLocator::resolve_all(&partial), None);
}

#[test]
fn test_modern_layout() {
    let mut builder = MemoryHost::builder().root_type_path("net.minecraft.server.level.ServerPlayer");
    let player = builder.class("net.minecraft.server.level.ServerPlayer", None, |_| {});
    let host = builder.build();
    let reflector = Reflector::new(Arc::new(host), config());

    assert_eq!(reflector.detect_scheme(), NamingScheme::Modern);
    let locator = reflector.locate("nms", "server.level.ServerPlayer");
    assert_eq!(
        locator.qualified_name().unwrap(),
        "net.minecraft.server.level.ServerPlayer"
    );
    assert_eq!(locator.resolve(), Some(player));
}

#[test]
fn test_unscoped_layout() {
    let mut builder = MemoryHost::builder().root_type_path("game.Server");
    let world = builder.class("net.minecraft.World", None, |_| {});
    let bare = builder.class("World", None, |_| {});
    let host = builder.build();
    let reflector = Reflector::new(Arc::new(host), config());

    assert_eq!(reflector.detect_scheme(), NamingScheme::Unscoped);
    let locator = reflector.locate("nms", "World");
    assert_eq!(locator.qualified_name().unwrap(), "net.minecraft.World");
    assert_eq!(locator.resolve(), Some(world));

    let global = reflector.locate_global("World");
    assert_eq!(global.qualified_name().unwrap(), "World");
    assert_eq!(global.resolve(), Some(bare));
}

#[test]
fn test_unversioned_server_root() {
    let mut builder = MemoryHost::builder().root_type_path("org.bukkit.craftbukkit.CraftServer");
    let level = builder.class("net.minecraft.server.level.ServerLevel", None, |_| {});
    let world = builder.class("org.bukkit.craftbukkit.CraftWorld", None, |_| {});
    let host = builder.build();
    let reflector = Reflector::new(Arc::new(host), config());

    assert_eq!(reflector.detect_scheme(), NamingScheme::Unscoped);
    assert_eq!(reflector.host_version(), None);
    let nms = reflector.locate("nms", "server.level.ServerLevel");
    assert_eq!(
        nms.qualified_name().unwrap(),
        "net.minecraft.server.level.ServerLevel"
    );
    assert_eq!(nms.resolve(), Some(level));

    assert_eq!(reflector.namespace_scheme("obc"), Ok(NamingScheme::Modern));
    assert_eq!(reflector.locate("obc", "CraftWorld").resolve(), Some(world));
}

#[test]
fn test_mixed_layout_per_namespace() {
    let mut builder = MemoryHost::builder().root_type_path("org.bukkit.craftbukkit.v1_20_R1.CraftServer");
    let world = builder.class("org.bukkit.craftbukkit.v1_20_R1.CraftWorld", None, |_| {});
    let level = builder.class("net.minecraft.server.level.ServerLevel", None, |_| {});
    let host = builder.build();
    let reflector = Reflector::new(Arc::new(host), config());

    assert_eq!(reflector.detect_scheme(), NamingScheme::Modern);
    assert_eq!(reflector.namespace_scheme("nms"), Ok(NamingScheme::Modern));
    assert_eq!(reflector.namespace_scheme("obc"), Ok(NamingScheme::Legacy));
    assert_eq!(
        reflector.namespace_scheme("mojang"),
        Err(ReflectError::UnknownNamespace("mojang".to_string()))
    );

    let obc = reflector.locate("obc", "CraftWorld");
    assert_eq!(
        obc.qualified_name().unwrap(),
        "org.bukkit.craftbukkit.v1_20_R1.CraftWorld"
    );
    assert_eq!(obc.resolve(), Some(world));

    let nms = reflector.locate("nms", "server.level.ServerLevel");
    assert_eq!(
        nms.qualified_name().unwrap(),
        "net.minecraft.server.level.ServerLevel"
    );
    assert_eq!(nms.resolve(), Some(level));
}

#[test]
fn test_legacy_without_version_token() {
    let host = MemoryHost::builder().root_type_path("Server").build();
    let reflector = Reflector::with_probe(
        Arc::new(host.clone()),
        config(),
        FixedProbe(NamingScheme::Legacy),
    );

    let locator = reflector.locate("nms", "Entity");
    assert_eq!(
        locator.qualified_name(),
        Err(ReflectError::UnknownVersion("Server".to_string()))
    );
    assert_eq!(locator.resolve(), None);
    assert_eq!(host.stats().type_lookups, 0);
}

#[test]
fn test_scheme_detected_once() {
    let fx = fixture();
    assert_eq!(fx.reflector.detect_scheme(), NamingScheme::Legacy);
    let after_first = fx.host.stats().type_lookups;
    for _ in 0..3 {
        assert_eq!(fx.reflector.detect_scheme(), NamingScheme::Legacy);
    }
    assert_eq!(fx.host.stats().type_lookups, after_first);
    assert_eq!(fx.reflector.host_version(), Some("v1_8_R3"));
}

#[test]
fn test_fixed_probe_skips_detection() {
    let fx = fixture();
    let reflector = Reflector::with_probe(
        Arc::new(fx.host.clone()),
        config(),
        FixedProbe(NamingScheme::Modern),
    );
    let before = fx.host.stats().type_lookups;
    assert_eq!(reflector.detect_scheme(), NamingScheme::Modern);
    assert_eq!(fx.host.stats().type_lookups, before);
    assert_eq!(
        reflector.locate("nms", "Entity").qualified_name().unwrap(),
        "net.minecraft.Entity"
    );
}

#[test]
fn test_default_config_has_no_namespaces() {
    let fx = fixture();
    let reflector = Reflector::new(Arc::new(fx.host.clone()), ReflectConfig::default());
    // Without a legacy probe a deep root package still reads as modern.
    assert_eq!(fx.host.root_type_path(), LEGACY_ROOT);
    assert_eq!(reflector.detect_scheme(), NamingScheme::Modern);
    assert!(matches!(
        reflector.locate("nms", "Entity").try_resolve(),
        Err(ReflectError::NotFound { .. })
    ));
}
