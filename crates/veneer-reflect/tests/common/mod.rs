//! Shared fixture: a legacy-layout host with a small entity hierarchy

#![allow(dead_code)]

use std::sync::Arc;

use veneer_host::{builtins, MemoryHost};
use veneer_reflect::{NamespaceConfig, ReflectConfig, Reflector, Versioning};
use veneer_sdk::{HostError, Modifiers, TypeHandle, Value};

pub const LEGACY_ROOT: &str = "org.bukkit.craftbukkit.v1_8_R3.CraftServer";

pub struct Fixture {
    pub host: MemoryHost,
    pub reflector: Arc<Reflector>,
    pub entity: TypeHandle,
    pub player: TypeHandle,
    pub packet: TypeHandle,
}

pub fn config() -> ReflectConfig {
    ReflectConfig::default()
        .with_namespace(
            "nms",
            NamespaceConfig::new("net.minecraft").with_legacy_infix("server"),
        )
        .with_namespace(
            "obc",
            NamespaceConfig::new("org.bukkit.craftbukkit").with_versioning(Versioning::RootDepth),
        )
        .with_legacy_probe("net.minecraft.server.{version}.WorldServer")
}

pub fn fixture() -> Fixture {
    fixture_with(true)
}

pub fn fixture_with(privileged: bool) -> Fixture {
    let mut builder = MemoryHost::builder()
        .root_type_path(LEGACY_ROOT)
        .privileged(privileged);

    builder.class("net.minecraft.server.v1_8_R3.WorldServer", None, |_| {});
    builder.class("org.bukkit.craftbukkit.v1_8_R3.CraftWorld", None, |_| {});

    let entity = builder.class("net.minecraft.server.v1_8_R3.Entity", None, |c| {
        c.field("name", builtins::STRING, Modifiers::PUBLIC, Value::from("steve"))
            .field("a", builtins::INT, Modifiers::PUBLIC, Value::Int(1))
            .field("b", builtins::INT, Modifiers::PUBLIC, Value::Int(2))
            .field("label", builtins::STRING, Modifiers::PUBLIC, Value::from("text"))
            .field("count", builtins::INT, Modifiers::PUBLIC, Value::Int(3))
            .field(
                "uuid",
                builtins::STRING,
                Modifiers::PRIVATE | Modifiers::READONLY,
                Value::from("u-1"),
            )
            .field(
                "MAX",
                builtins::INT,
                Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::READONLY,
                Value::Int(100),
            )
            .field("spawned", builtins::INT, Modifiers::PUBLIC | Modifiers::STATIC, Value::Int(0));

        c.method("getA", Some(builtins::INT), &[], Modifiers::PUBLIC, |call| call.field("a"))
            .method("add", Some(builtins::INT), &[builtins::INT], Modifiers::PUBLIC, |call| {
                let a = call.field("a")?.as_i32().unwrap_or(0);
                let n = call.arg(0).as_i32().unwrap_or(0);
                Ok(Value::Int(a + n))
            })
            .method("add", Some(builtins::LONG), &[builtins::LONG], Modifiers::PUBLIC, |call| {
                let n = call.arg(0).as_i64().unwrap_or(0);
                Ok(Value::Long(n * 1000))
            })
            .method("getName", Some(builtins::STRING), &[], Modifiers::PUBLIC, |call| call.field("name"))
            .method("setName", None, &[builtins::STRING], Modifiers::PUBLIC, |call| {
                call.store("name", call.arg(0))?;
                Ok(Value::Null)
            })
            .method("getB", Some(builtins::INT), &[], Modifiers::PUBLIC, |call| call.field("b"))
            .method("spawned", Some(builtins::INT), &[], Modifiers::PUBLIC | Modifiers::STATIC, |call| {
                call.static_field("spawned")
            })
            .method("fail", Some(builtins::INT), &[], Modifiers::PUBLIC, |_| {
                Err(HostError::Invocation("boom".to_string()))
            });

        c.constructor(&[], |call| {
            let spawned = call.static_field("spawned")?.as_i32().unwrap_or(0);
            call.store_static("spawned", Value::Int(spawned + 1))
                .map(|_| Value::Null)
        })
        .constructor(&[builtins::STRING], |call| {
            call.store("name", call.arg(0))?;
            call.store("uuid", Value::from("u-ctor"))?;
            Ok(Value::Null)
        })
        .constructor(&[builtins::INT], |_| Err(HostError::Invocation("rejected".to_string())));
    });

    let player = builder.class("net.minecraft.server.v1_8_R3.EntityPlayer", Some(entity), |c| {
        c.field("ping", builtins::INT, Modifiers::PUBLIC, Value::Int(50))
            .field("latency", builtins::LONG, Modifiers::PUBLIC, Value::Long(75))
            .field("owner", entity, Modifiers::PUBLIC, Value::Null);
    });

    let packet = builder.class("net.minecraft.server.v1_8_R3.PacketPlayOutChat", None, |c| {
        c.field("f1", builtins::INT, Modifiers::PRIVATE, Value::Int(10))
            .field("f2", builtins::INT, Modifiers::PRIVATE, Value::Int(20))
            .field("f3", builtins::INT, Modifiers::PUBLIC, Value::Int(30))
            .field("f4", builtins::INT, Modifiers::PRIVATE, Value::Int(40))
            .field("msg", builtins::STRING, Modifiers::PRIVATE, Value::from("hi"));
    });

    let host = builder.build();
    let reflector = Reflector::new(Arc::new(host.clone()), config());
    Fixture {
        host,
        reflector,
        entity,
        player,
        packet,
    }
}
