//! Minimal diff between the baseline and the working list.

use crate::types::{position, BaselineImage, ImageEntry};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCreate {
    pub entry_id: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    pub image_id: String,
    pub order: i32,
}

/// Remote operations needed to turn the baseline into the working list.
/// The three batches address disjoint server ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDiff {
    pub to_delete: Vec<BaselineImage>,
    pub to_create: Vec<PlannedCreate>,
    pub to_update: Vec<PlannedUpdate>,
}

impl ImageDiff {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_create.is_empty() && self.to_update.is_empty()
    }

    pub fn operation_count(&self) -> usize {
        self.to_delete.len() + self.to_create.len() + self.to_update.len()
    }
}

pub fn compute_diff(baseline: &[BaselineImage], working: &[ImageEntry]) -> ImageDiff {
    // Only entries with a server counterpart keep a baseline record alive
    let kept: HashSet<&str> = working
        .iter()
        .filter(|entry| !entry.is_new())
        .map(|entry| entry.id.as_str())
        .collect();

    let to_delete = baseline
        .iter()
        .filter(|image| !kept.contains(image.id.as_str()))
        .cloned()
        .collect();

    let baseline_orders: HashMap<&str, Option<i32>> = baseline
        .iter()
        .map(|image| (image.id.as_str(), image.order))
        .collect();

    let mut to_create = Vec::new();
    let mut to_update = Vec::new();

    for (index, entry) in working.iter().enumerate() {
        let order = position(index);

        if entry.is_new() {
            to_create.push(PlannedCreate { entry_id: entry.id.clone(), order });
            continue;
        }

        match baseline_orders.get(entry.id.as_str()) {
            Some(Some(current)) if *current == order => {}
            Some(_) => to_update.push(PlannedUpdate { image_id: entry.id.clone(), order }),
            // Not on the server (any more): nothing to reorder
            None => {}
        }
    }

    ImageDiff { to_delete, to_create, to_update }
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
