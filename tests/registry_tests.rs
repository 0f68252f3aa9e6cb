// Host-side tests for page listener bookkeeping.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod registry {
    include!("../src/registry.rs");
}

use registry::Registry;
use std::rc::Rc;

#[test]
fn retiring_keeps_the_entry_alive_until_collect() {
    let mut reg = Registry::default();
    let token = Rc::new(());
    let id = reg.next_id();
    reg.insert(id, token.clone());

    assert!(reg.retire(id).is_some());
    assert_eq!(reg.live(), 0);
    // Still owned by the registry: a callback retiring itself is not freed.
    assert_eq!(Rc::strong_count(&token), 2);

    reg.collect();
    assert_eq!(Rc::strong_count(&token), 1);
}

#[test]
fn second_retire_of_the_same_id_is_ignored() {
    let mut reg = Registry::default();
    let id = reg.next_id();
    reg.insert(id, "reveal");
    assert_eq!(reg.retire(id), Some(&"reveal"));
    assert_eq!(reg.retire(id), None);
    assert_eq!(reg.retired(), 1);
}

#[test]
fn retire_all_returns_only_entries_still_live() {
    let mut reg = Registry::default();
    let nav = reg.next_id();
    reg.insert(nav, "nav");
    let reveal = reg.next_id();
    reg.insert(reveal, "reveal");
    reg.retire(reveal);

    let removed = reg.retire_all().to_vec();
    assert_eq!(removed, vec!["nav"]);
    assert_eq!(reg.live(), 0);
    assert_eq!(reg.retired(), 2);

    reg.collect();
    assert_eq!(reg.retired(), 0);
    assert!(reg.retire_all().is_empty());
}

#[test]
fn ids_are_not_reused() {
    let mut reg: Registry<()> = Registry::default();
    let a = reg.next_id();
    reg.insert(a, ());
    reg.retire(a);
    reg.collect();
    assert_ne!(reg.next_id(), a);
}
