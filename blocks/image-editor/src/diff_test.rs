use super::*;
use crate::types::{EntrySource, PendingContent};

fn base(id: &str, order: i32) -> BaselineImage {
    BaselineImage {
        id: id.to_string(),
        src: format!("https://bucket.s3.amazonaws.com/{id}"),
        order: Some(order),
    }
}

fn kept(id: &str) -> ImageEntry {
    ImageEntry::existing(&base(id, 0))
}

fn new_entry(id: &str) -> ImageEntry {
    ImageEntry {
        id: id.to_string(),
        display_url: "data:image/png;base64,".to_string(),
        source: EntrySource::Pending {
            content: PendingContent {
                file_name: "a.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            },
        },
    }
}

fn update(id: &str, order: i32) -> PlannedUpdate {
    PlannedUpdate { image_id: id.to_string(), order }
}

// =============================================================================
// no-op
// =============================================================================

#[test]
fn untouched_baseline_is_noop() {
    let baseline = vec![base("a", 0), base("b", 1), base("c", 2)];
    let working: Vec<ImageEntry> = baseline.iter().map(ImageEntry::existing).collect();
    assert!(compute_diff(&baseline, &working).is_empty());
}

#[test]
fn empty_baseline_and_empty_working_list_is_noop() {
    assert!(compute_diff(&[], &[]).is_empty());
}

// =============================================================================
// reorder
// =============================================================================

#[test]
fn swap_updates_only_moved_entries() {
    let baseline = vec![base("a", 0), base("b", 1), base("c", 2)];
    let working = vec![kept("b"), kept("a"), kept("c")];

    let diff = compute_diff(&baseline, &working);
    assert!(diff.to_delete.is_empty());
    assert!(diff.to_create.is_empty());
    assert_eq!(diff.to_update, vec![update("b", 0), update("a", 1)]);
}

#[test]
fn rotation_updates_every_shifted_entry() {
    let baseline = vec![base("a", 0), base("b", 1), base("c", 2)];
    let working = vec![kept("c"), kept("a"), kept("b")];

    let diff = compute_diff(&baseline, &working);
    assert_eq!(diff.to_update, vec![update("c", 0), update("a", 1), update("b", 2)]);
}

#[test]
fn gappy_baseline_orders_are_normalised() {
    let baseline = vec![base("a", 0), base("b", 5)];
    let working = vec![kept("a"), kept("b")];

    let diff = compute_diff(&baseline, &working);
    assert_eq!(diff.to_update, vec![update("b", 1)]);
}

#[test]
fn missing_baseline_order_is_written() {
    let baseline = vec![BaselineImage { id: "a".to_string(), src: String::new(), order: None }];
    let diff = compute_diff(&baseline, &[kept("a")]);
    assert_eq!(diff.to_update, vec![update("a", 0)]);
}

// =============================================================================
// delete + create
// =============================================================================

#[test]
fn removed_cover_with_new_image() {
    let baseline = vec![base("a", 0), base("b", 1)];
    let working = vec![kept("b"), new_entry("pending-1")];

    let diff = compute_diff(&baseline, &working);
    assert_eq!(diff.to_delete, vec![base("a", 0)]);
    assert_eq!(
        diff.to_create,
        vec![PlannedCreate { entry_id: "pending-1".to_string(), order: 1 }]
    );
    assert_eq!(diff.to_update, vec![update("b", 0)]);
}

#[test]
fn removing_everything_deletes_whole_baseline() {
    let baseline = vec![base("a", 0), base("b", 1)];
    let diff = compute_diff(&baseline, &[]);
    assert_eq!(diff.to_delete.len(), 2);
    assert_eq!(diff.operation_count(), 2);
}

#[test]
fn new_entries_take_their_final_position() {
    let baseline = vec![base("a", 0)];
    let working = vec![new_entry("pending-1"), kept("a"), new_entry("pending-2")];

    let diff = compute_diff(&baseline, &working);
    let orders: Vec<(String, i32)> = diff.to_create.iter().map(|c| (c.entry_id.clone(), c.order)).collect();
    assert_eq!(orders, vec![("pending-1".to_string(), 0), ("pending-2".to_string(), 2)]);
    assert_eq!(diff.to_update, vec![update("a", 1)]);
}

#[test]
fn new_entry_never_deletes_baseline_with_same_id() {
    // A new entry cannot keep a baseline record alive even if ids clash
    let baseline = vec![base("a", 0)];
    let diff = compute_diff(&baseline, &[new_entry("a")]);
    assert_eq!(diff.to_delete, vec![base("a", 0)]);
    assert_eq!(diff.to_create.len(), 1);
}

#[test]
fn existing_entry_unknown_to_baseline_is_ignored() {
    let diff = compute_diff(&[], &[kept("ghost")]);
    assert!(diff.is_empty());
}

#[test]
fn batches_address_disjoint_ids() {
    let baseline = vec![base("a", 0), base("b", 1), base("c", 2)];
    let working = vec![kept("c"), new_entry("pending-1"), kept("a")];

    let diff = compute_diff(&baseline, &working);
    let deleted: HashSet<&str> = diff.to_delete.iter().map(|d| d.id.as_str()).collect();
    let updated: HashSet<&str> = diff.to_update.iter().map(|u| u.image_id.as_str()).collect();
    assert!(deleted.is_disjoint(&updated));
    assert_eq!(deleted, HashSet::from(["b"]));
    assert_eq!(updated, HashSet::from(["c", "a"]));
}
