// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use sakubumi::store::{CategoryStore, MemoryStore, TransactionStore};
use sakubumi::{cli, commands::categories, commands::transactions};

fn run(store: &mut MemoryStore, args: &[&str]) -> anyhow::Result<bool> {
    let mut argv = vec!["sakubumi"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("category", sub)) => categories::handle(store, sub),
        Some(("tx", sub)) => transactions::handle(store, sub),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn add_trims_name_and_defaults_icon() {
    let mut store = MemoryStore::new();
    let changed = run(&mut store, &["category", "add", "--name", "  Food  ", "--type", "expense"]).unwrap();
    assert!(changed);
    let cats = store.list_categories().unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Food");
    assert_eq!(cats[0].icon.as_deref(), Some("🏷️"));
}

#[test]
fn blank_name_is_rejected() {
    let mut store = MemoryStore::new();
    assert!(run(&mut store, &["category", "add", "--name", "   ", "--type", "income"]).is_err());
    assert!(store.list_categories().unwrap().is_empty());
}

#[test]
fn referenced_category_survives_delete() {
    let mut store = MemoryStore::new();
    run(&mut store, &["category", "add", "--name", "Food", "--type", "expense"]).unwrap();
    run(
        &mut store,
        &["tx", "add", "--amount", "25.000", "--type", "expense", "--category", "food", "--date", "2025-03-04"],
    )
    .unwrap();
    let id = store.list_categories().unwrap()[0].id.clone();

    let err = run(&mut store, &["category", "rm", "--id", &id, "--yes"]).unwrap_err();
    assert!(err.to_string().contains("Cannot delete"), "{}", err);
    assert_eq!(store.list_categories().unwrap().len(), 1);

    let tx_id = store.list_transactions().unwrap()[0].id.clone();
    assert!(run(&mut store, &["tx", "rm", "--id", &tx_id, "--yes"]).unwrap());
    assert!(run(&mut store, &["category", "rm", "--id", &id, "--yes"]).unwrap());
    assert!(store.list_categories().unwrap().is_empty());
}

#[test]
fn deleting_unknown_category_reports_not_found() {
    let mut store = MemoryStore::new();
    let err = run(&mut store, &["category", "rm", "--id", "ghost", "--yes"]).unwrap_err();
    assert!(err.to_string().contains("not found"), "{}", err);
}
