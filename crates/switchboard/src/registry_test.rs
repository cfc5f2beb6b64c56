//! Tests for the client registry
//!
//! Covers slot allocation, capacity limits, monotonic id assignment, and
//! the seen-vs-live distinction.

use std::net::SocketAddr;

use patchbay_protocol::ClientId;

use crate::{ClientHandle, ClientRegistry, SwitchboardError};

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

fn register(registry: &mut ClientRegistry) -> ClientId {
    let (handle, _rx) = ClientHandle::channel();
    registry.register(peer(), handle).unwrap()
}

#[test]
fn test_ids_start_at_one_and_are_monotonic() {
    let mut registry = ClientRegistry::new(4);
    assert_eq!(register(&mut registry), ClientId::new(1));
    assert_eq!(register(&mut registry), ClientId::new(2));
    assert_eq!(register(&mut registry), ClientId::new(3));
}

#[test]
fn test_default_name_follows_id() {
    let mut registry = ClientRegistry::new(2);
    let id = register(&mut registry);
    assert_eq!(registry.get(id).unwrap().name(), "Client1");
}

#[test]
fn test_register_full_registry_fails() {
    let mut registry = ClientRegistry::new(2);
    register(&mut registry);
    register(&mut registry);

    let (handle, _rx) = ClientHandle::channel();
    let err = registry.register(peer(), handle).unwrap_err();
    assert_eq!(err, SwitchboardError::capacity_exceeded(2));
}

#[test]
fn test_deregister_frees_slot_without_renumbering() {
    let mut registry = ClientRegistry::new(2);
    let first = register(&mut registry);
    let second = register(&mut registry);

    assert!(registry.deregister(first).is_some());
    assert!(!registry.is_live(first));
    assert!(registry.is_live(second));
    assert_eq!(registry.get(second).unwrap().id(), second);

    // Freed slot is reusable, but the id is brand new
    let third = register(&mut registry);
    assert_eq!(third, ClientId::new(3));
}

#[test]
fn test_ids_are_never_reused() {
    let mut registry = ClientRegistry::new(1);
    let ids: Vec<u32> = (0..5)
        .map(|_| {
            let id = register(&mut registry);
            registry.deregister(id);
            id.as_u32()
        })
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_deregister_unknown_id_is_noop() {
    let mut registry = ClientRegistry::new(2);
    register(&mut registry);
    assert!(registry.deregister(ClientId::new(99)).is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_was_seen_tracks_issued_ids() {
    let mut registry = ClientRegistry::new(2);
    let id = register(&mut registry);
    registry.deregister(id);

    assert!(registry.was_seen(id));
    assert!(!registry.is_live(id));
    assert!(!registry.was_seen(ClientId::new(2)));
    assert!(!registry.was_seen(ClientId::new(0)));
}

#[test]
fn test_iter_follows_slot_order() {
    let mut registry = ClientRegistry::new(3);
    let a = register(&mut registry);
    let b = register(&mut registry);
    registry.deregister(a);
    // New client fills the freed first slot, so it lists before b
    let c = register(&mut registry);

    let order: Vec<ClientId> = registry.iter().map(|s| s.id()).collect();
    assert_eq!(order, vec![c, b]);
}

#[test]
fn test_len_and_capacity() {
    let mut registry = ClientRegistry::new(3);
    assert!(registry.is_empty());
    register(&mut registry);
    register(&mut registry);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.capacity(), 3);
}
