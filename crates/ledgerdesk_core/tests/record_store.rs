use ledgerdesk_core::store::SequenceIdGenerator;
use ledgerdesk_core::{CustomerRecord, RecordStore, StoreRecord, UpdateMode, UpdateOutcome};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Item {
    id: String,
    label: String,
}

impl Item {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

impl StoreRecord for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

fn ids(store: &RecordStore<Item>) -> Vec<&str> {
    store.all().iter().map(|item| item.id.as_str()).collect()
}

#[test]
fn new_store_is_empty() {
    let store = RecordStore::<Item>::new();
    assert!(store.is_empty());
    assert_eq!(store.update_mode(), UpdateMode::Replace);
}

#[test]
fn seed_replaces_contents_in_order() {
    let mut store = RecordStore::new();
    store.add(Item::new("old", "stale"));

    store.seed(vec![Item::new("a", "1"), Item::new("b", "2"), Item::new("c", "3")]);

    assert_eq!(ids(&store), ["a", "b", "c"]);
    assert!(!store.contains("old"));
}

#[test]
fn seed_keeps_duplicate_ids_as_given() {
    let mut store = RecordStore::new();
    store.seed(vec![Item::new("a", "1"), Item::new("a", "2")]);
    assert_eq!(store.len(), 2);
}

#[test]
fn add_assigns_id_when_missing_and_appends() {
    let mut store = RecordStore::new();
    store.seed(vec![Item::new("a", "1")]);

    let id = store.add(Item::new("", "fresh"));

    assert!(!id.is_empty());
    assert_ne!(id, "a");
    assert_eq!(store.len(), 2);
    assert_eq!(store.all()[1].id, id);
    assert_eq!(store.all()[1].label, "fresh");
}

#[test]
fn add_keeps_caller_supplied_id() {
    let mut store = RecordStore::new();
    let id = store.add(Item::new("given", "x"));
    assert_eq!(id, "given");
    assert_eq!(store.get("given").unwrap().label, "x");
}

#[test]
fn caller_supplied_duplicate_id_is_stored_as_given() {
    let mut store = RecordStore::new().with_id_generator(SequenceIdGenerator::new(["a", "b"]));
    store.seed(vec![Item::new("a", "seeded")]);

    assert_eq!(store.add(Item::new("a", "copy")), "a");
    assert_eq!(store.add(Item::new("", "generated")), "b");

    assert_eq!(ids(&store), ["a", "a", "b"]);
}

#[test]
fn add_jane_doe_customer_gets_fresh_id() {
    let mut store = RecordStore::new();
    store.seed(vec![CustomerRecord::with_id(
        "c1",
        "Ada Lovelace",
        "ada@example.com",
        "https://example.com/ada.png",
    )]);

    let id = store.add(CustomerRecord::new(
        "Jane Doe",
        "jane@example.com",
        "https://example.com/jane.png",
    ));

    assert_eq!(store.len(), 2);
    assert_ne!(id, "c1");
    let jane = store.get(&id).unwrap();
    assert_eq!(jane.name, "Jane Doe");
    assert_eq!(jane.total_invoices, 0);
}

#[test]
fn add_retries_when_generator_collides() {
    let mut store = RecordStore::new().with_id_generator(SequenceIdGenerator::new(["a", "a", "b"]));
    store.seed(vec![Item::new("a", "seeded")]);

    let id = store.add(Item::new("", "new"));

    assert_eq!(id, "b");
    assert_eq!(ids(&store), ["a", "b"]);
}

#[test]
fn add_derives_suffix_when_generator_never_yields_fresh_id() {
    let mut store =
        RecordStore::new().with_id_generator(SequenceIdGenerator::new(vec!["a"; 32]));
    store.seed(vec![Item::new("a", "seeded")]);

    let id = store.add(Item::new("", "new"));

    assert_eq!(id, "a-1");
    assert_eq!(ids(&store), ["a", "a-1"]);
}

#[test]
fn generated_ids_are_unique_across_many_adds() {
    let mut store = RecordStore::new();
    for index in 0..200 {
        store.add(Item::new("", &index.to_string()));
    }
    let unique = store.all().iter().map(|item| item.id.clone()).collect::<HashSet<_>>();
    assert_eq!(unique.len(), 200);
}

#[test]
fn remove_drops_every_matching_record() {
    let mut store = RecordStore::new();
    store.seed(vec![Item::new("a", "1"), Item::new("b", "2"), Item::new("a", "3")]);

    assert_eq!(store.remove("a"), 2);
    assert_eq!(ids(&store), ["b"]);
}

#[test]
fn remove_unknown_id_is_noop() {
    let mut store = RecordStore::new();
    store.seed(vec![Item::new("a", "1")]);

    assert_eq!(store.remove("missing"), 0);
    assert_eq!(ids(&store), ["a"]);
}

#[test]
fn update_replaces_in_place() {
    let mut store = RecordStore::new();
    store.seed(vec![Item::new("a", "1"), Item::new("b", "2"), Item::new("c", "3")]);

    let outcome = store.update(Item::new("b", "edited"));

    assert_eq!(outcome, UpdateOutcome::Replaced(1));
    assert_eq!(ids(&store), ["a", "b", "c"]);
    assert_eq!(store.get("b").unwrap().label, "edited");
}

#[test]
fn update_unknown_id_is_missing_and_changes_nothing() {
    let mut store = RecordStore::new();
    store.seed(vec![Item::new("a", "1")]);

    assert_eq!(store.update(Item::new("zzz", "x")), UpdateOutcome::Missing);
    assert_eq!(store.all(), [Item::new("a", "1")]);
}

#[test]
fn append_compat_update_duplicates_the_id() {
    let mut store = RecordStore::with_mode(UpdateMode::AppendCompat);
    store.seed(vec![Item::new("a", "1")]);

    assert_eq!(store.update(Item::new("a", "2")), UpdateOutcome::Appended);

    assert_eq!(store.all(), [Item::new("a", "1"), Item::new("a", "2")]);
    assert_eq!(store.get("a").unwrap().label, "1");
}

#[test]
fn observers_see_every_change_until_unsubscribed() {
    let mut store = RecordStore::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let observer = store.subscribe(move |records: &[Item]| sink.borrow_mut().push(records.len()));

    store.seed(vec![Item::new("a", "1")]);
    store.add(Item::new("b", "2"));
    store.remove("missing");
    store.remove("a");
    assert!(store.unsubscribe(observer));
    store.add(Item::new("c", "3"));

    assert_eq!(*seen.borrow(), [1, 2, 1]);
    assert!(!store.unsubscribe(observer));
}
