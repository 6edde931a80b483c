//! Integration tests for field resolution and typed field access

mod common;

use std::sync::Arc;

use common::{config, fixture};
use veneer_host::{builtins, MemoryHost};
use veneer_reflect::field::{resolve_by_names, resolve_by_ordinal};
use veneer_reflect::{FieldStorage, ReflectError, Reflector, SymbolKind};
use veneer_sdk::{HostError, HostRuntime, Modifiers, ObjectRef, Value};

#[test]
fn test_first_existing_name_wins() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    let field = entity.field::<i32>(Some(builtins::INT), &["missing", "b", "a"]);

    assert_eq!(field.resolve().map(|f| f.name.as_str()), Some("b"));
    let obj = fx.host.instantiate(fx.entity).unwrap();
    assert_eq!(field.get(Some(obj), -1), 2);
}

#[test]
fn test_name_order_without_type_filter() {
    let mut builder = MemoryHost::builder();
    let ty = builder.class("demo.Pair", None, |c| {
        c.field("a", builtins::INT, Modifiers::PRIVATE, Value::Int(1))
            .field("b", builtins::STRING, Modifiers::PRIVATE, Value::from("two"));
    });
    let host = builder.build();
    let reflector = Reflector::new(Arc::new(host.clone()), config());

    let field = reflector.bind(ty).field::<String>(None, &["missing", "b", "a"]);
    assert_eq!(field.resolve().map(|f| f.name.as_str()), Some("b"));
    let obj = host.instantiate(ty).unwrap();
    assert_eq!(field.get(Some(obj), String::new()), "two");
}

#[test]
fn test_incompatible_candidate_is_skipped() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    // `label` exists but holds a string
    let field = entity.field::<i32>(Some(builtins::INT), &["label", "count"]);
    assert_eq!(field.resolve().map(|f| f.name.as_str()), Some("count"));

    let none = entity.field::<i32>(Some(builtins::INT), &["label", "name"]);
    assert!(!none.is_valid());
}

#[test]
fn test_expected_type_accepts_subtypes() {
    let fx = fixture();
    let player = fx.reflector.locate("nms", "EntityPlayer");
    let owner = player.field::<ObjectRef>(Some(builtins::OBJECT), &["owner"]);
    assert!(owner.is_valid());

    let ping = player.field::<i32>(Some(builtins::OBJECT), &["ping"]);
    assert!(!ping.is_valid());
}

#[test]
fn test_any_type_when_unconstrained() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    let label = entity.field::<String>(None, &["label"]);
    let obj = fx.host.instantiate(fx.entity).unwrap();
    assert_eq!(label.get_opt(Some(obj)).as_deref(), Some("text"));
}

#[test]
fn test_ordinal_with_exact_modifiers() {
    let fx = fixture();
    let packet = fx.reflector.locate("nms", "PacketPlayOutChat");
    let obj = fx.host.instantiate(fx.packet).unwrap();

    // f1, f2, f4 are private ints; f3 is public
    let second = packet.field_by_ordinal::<i32>(Some(builtins::INT), Modifiers::PRIVATE, 2);
    assert_eq!(second.get(Some(obj), 0), 20);

    let third = packet.field_by_ordinal::<i32>(Some(builtins::INT), Modifiers::PRIVATE, 3);
    assert_eq!(third.resolve().map(|f| f.name.as_str()), Some("f4"));
    assert_eq!(third.get(Some(obj), 0), 40);

    let first_public = packet.field_by_ordinal::<i32>(Some(builtins::INT), Modifiers::PUBLIC, 1);
    assert_eq!(first_public.get(Some(obj), 0), 30);

    let past_end = packet.field_by_ordinal::<i32>(Some(builtins::INT), Modifiers::PRIVATE, 4);
    assert!(!past_end.is_valid());

    let zero = packet.field_by_ordinal::<i32>(Some(builtins::INT), Modifiers::PRIVATE, 0);
    assert!(!zero.is_valid());
}

#[test]
fn test_ordinal_type_filter() {
    let fx = fixture();
    let host = fx.reflector.host();
    // `msg` is the fourth private field but the only private string
    let msg = resolve_by_ordinal(host, fx.packet, Some(builtins::STRING), Modifiers::PRIVATE, 1);
    assert_eq!(msg.map(|f| f.name), Some("msg".to_string()));

    let any = resolve_by_ordinal(host, fx.packet, None, Modifiers::PRIVATE, 4);
    assert_eq!(any.map(|f| f.name), Some("msg".to_string()));
}

#[test]
fn test_resolve_by_names_direct() {
    let fx = fixture();
    let host = fx.reflector.host();
    assert_eq!(
        resolve_by_names(host, fx.entity, None, &["nope", "a"]).map(|f| f.name),
        Some("a".to_string())
    );
    assert!(resolve_by_names(host, fx.entity, None, &[]).is_none());
}

#[test]
fn test_field_resolves_once() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    let field = entity.field::<i32>(Some(builtins::INT), &["missing", "b"]);
    let obj = fx.host.instantiate(fx.entity).unwrap();

    field.get(Some(obj), 0);
    let after_first = fx.host.stats();
    for _ in 0..4 {
        field.get(Some(obj), 0);
        field.set(Some(obj), 9);
    }
    let after = fx.host.stats();
    assert_eq!(after.field_lookups, after_first.field_lookups);
    assert_eq!(after.type_lookups, after_first.type_lookups);
    assert_eq!(field.get(Some(obj), 0), 9);
}

#[test]
fn test_set_regular_field() {
    let fx = fixture();
    let player = fx.reflector.locate("nms", "EntityPlayer");
    let ping = player.field::<i32>(Some(builtins::INT), &["ping"]);
    let obj = fx.host.instantiate(fx.player).unwrap();

    assert_eq!(ping.storage(), Some(FieldStorage::Regular));
    ping.set(Some(obj), 120);
    assert_eq!(fx.host.peek(obj, "ping"), Some(Value::Int(120)));
    assert_eq!(ping.try_set(Some(obj), 5), Ok(()));
    assert_eq!(ping.get(Some(obj), 0), 5);
}

#[test]
fn test_set_rejects_value_of_wrong_kind() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    let a = entity.field::<String>(None, &["a"]);
    let obj = fx.host.instantiate(fx.entity).unwrap();

    a.set(Some(obj), "oops".to_string());
    assert_eq!(fx.host.peek(obj, "a"), Some(Value::Int(1)));
    assert!(matches!(
        a.try_set(Some(obj), "oops".to_string()),
        Err(ReflectError::Host(HostError::IncompatibleValue { found: "string", .. }))
    ));

    let count = entity.field::<i32>(None, &["count"]);
    assert_eq!(count.get(Some(obj), 0), 3);
}

#[test]
fn test_static_field_ignores_instance() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    let spawned = entity.field::<i32>(Some(builtins::INT), &["spawned"]);
    spawned.set(None, 4);
    assert_eq!(spawned.get(None, 0), 4);
    assert_eq!(fx.host.peek_static(fx.entity, "spawned"), Some(Value::Int(4)));
}

#[test]
fn test_incompatible_value_returns_default() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    let label = entity.field::<i32>(None, &["label"]);
    let obj = fx.host.instantiate(fx.entity).unwrap();

    assert_eq!(label.get(Some(obj), 17), 17);
    assert!(matches!(
        label.try_get(Some(obj)),
        Err(ReflectError::TypeMismatch { .. })
    ));
}

#[test]
fn test_int_widens_to_long() {
    let fx = fixture();
    let player = fx.reflector.locate("nms", "EntityPlayer");
    let obj = fx.host.instantiate(fx.player).unwrap();
    let ping = player.field::<i64>(None, &["ping"]);
    assert_eq!(ping.get(Some(obj), 0), 50);
}

#[test]
fn test_null_reads_as_none() {
    let fx = fixture();
    let player = fx.reflector.locate("nms", "EntityPlayer");
    let owner = player.field::<ObjectRef>(Some(fx.entity), &["owner"]);
    let obj = fx.host.instantiate(fx.player).unwrap();

    assert_eq!(owner.try_get(Some(obj)), Ok(None));
    assert_eq!(owner.get_opt(Some(obj)), None);

    let other = fx.host.instantiate(fx.entity).unwrap();
    owner.set(Some(obj), other);
    assert_eq!(owner.get_opt(Some(obj)), Some(other));
}

#[test]
fn test_graceful_absence() {
    let fx = fixture();
    let missing = fx.reflector.locate("nms", "PlayerConnection").quiet();
    let field = missing.field::<i32>(Some(builtins::INT), &["ping"]);
    let obj = fx.host.instantiate(fx.entity).unwrap();

    assert!(!field.is_valid());
    assert_eq!(field.get(Some(obj), 42), 42);
    field.set(Some(obj), 1);
    field.remove_immutability();
    assert!(!field.is_immutability_removed());
    assert_eq!(
        field.try_get(Some(obj)),
        Err(ReflectError::not_found(SymbolKind::Field, "ping"))
    );
}

#[test]
fn test_missing_receiver_is_absorbed() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    let a = entity.field::<i32>(Some(builtins::INT), &["a"]);
    assert_eq!(a.get(None, -1), -1);
    assert!(matches!(a.try_get(None), Err(ReflectError::Host(_))));
}

#[test]
fn test_inherited_field_on_subclass_instance() {
    let fx = fixture();
    let entity = fx.reflector.locate("nms", "Entity");
    let name = entity.field::<String>(Some(builtins::STRING), &["name"]);
    let player = fx.host.instantiate(fx.player).unwrap();
    assert_eq!(name.get(Some(player), String::new()), "steve");
    assert!(fx.host.is_assignable(fx.entity, fx.player));
}
