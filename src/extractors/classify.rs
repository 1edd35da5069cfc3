use crate::options::{ChecklistMode, ConvertOptions};
use crate::parse::{TaskRecord, ARCHIVED_STATUS, DONE_STATUS};
use std::collections::{HashMap, HashSet};

/// The strategy used to pull checklists out of the record stream. Exactly one is active for a
/// conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChecklistPolicy<'c> {
    /// No checklists at all: every non-note is a regular task.
    None,
    /// Every record in the given folder is a checklist item, grouped by list name with no
    /// nesting.
    Flat { folder: &'c str },
    /// Checklists are the trees formed by `parentId` links.
    Tree,
}
impl<'c> ChecklistPolicy<'c> {
    pub fn from_options(opts: &'c ConvertOptions) -> Self {
        match opts.checklists {
            ChecklistMode::None => Self::None,
            ChecklistMode::Flat => Self::Flat {
                folder: &opts.checklist_folder,
            },
            ChecklistMode::Tree => Self::Tree,
        }
    }
}

/// The lifecycle state of a regular task, from its status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Todo,
    Done,
    Archived,
}
impl TaskState {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(DONE_STATUS) => Self::Done,
            Some(ARCHIVED_STATUS) => Self::Archived,
            _ => Self::Todo,
        }
    }

    /// The outline keyword for this state. Archived tasks are simply done once they're in the
    /// archive document.
    pub fn keyword(self, archive_context: bool) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Done => "DONE",
            Self::Archived if archive_context => "DONE",
            Self::Archived => "ARCHIVED",
        }
    }
}

/// A single line of a checklist note.
#[derive(Clone, Copy, Debug)]
pub struct ChecklistEntry<'a> {
    /// How deeply this item is nested (tree roots are at depth zero).
    pub depth: usize,
    pub record: &'a TaskRecord,
}

/// A set of checklist records that together become one note.
#[derive(Debug)]
pub struct ChecklistGroup<'a> {
    pub title: String,
    /// The record this note takes its dates, tags, and location from. For trees, this is the
    /// root, and for flat lists it's the first item.
    pub anchor: &'a TaskRecord,
    /// The checkbox lines, in pre-order (a tree's root is its first line).
    pub items: Vec<ChecklistEntry<'a>>,
}
impl<'a> ChecklistGroup<'a> {
    /// Every record in this group, in line order.
    pub fn records(&self) -> impl Iterator<Item = &'a TaskRecord> + '_ {
        self.items.iter().map(|entry| entry.record)
    }
}

/// A total, disjoint split of a batch of records into notes, checklists, and regular tasks.
#[derive(Debug)]
pub struct Classification<'a> {
    pub notes: Vec<&'a TaskRecord>,
    pub checklists: Vec<ChecklistGroup<'a>>,
    /// Regular tasks in their original order.
    pub tasks: Vec<(&'a TaskRecord, TaskState)>,
}
impl<'a> Classification<'a> {
    /// Classifies the given records under the given checklist policy. Kind-tagged notes are
    /// always notes, whatever their relations, and a record pulled into a checklist is never
    /// also a task or a note.
    pub fn classify(records: &'a [TaskRecord], policy: ChecklistPolicy<'_>) -> Self {
        let is_checklist = match policy {
            ChecklistPolicy::None => vec![false; records.len()],
            ChecklistPolicy::Flat { folder } => records
                .iter()
                .map(|r| !r.is_note() && r.folder() == folder)
                .collect(),
            ChecklistPolicy::Tree => tree_membership(records),
        };

        let checklists = match policy {
            ChecklistPolicy::None => Vec::new(),
            ChecklistPolicy::Flat { .. } => flat_groups(records, &is_checklist),
            ChecklistPolicy::Tree => tree_groups(records, &is_checklist),
        };

        let mut notes = Vec::new();
        let mut tasks = Vec::new();
        for (record, checklist) in records.iter().zip(&is_checklist) {
            if record.is_note() {
                notes.push(record);
            } else if !checklist {
                tasks.push((record, TaskState::from_code(record.status.as_deref())));
            }
        }

        Self {
            notes,
            checklists,
            tasks,
        }
    }

    /// Every record that ended up in a checklist.
    pub fn checklist_items(&self) -> impl Iterator<Item = &'a TaskRecord> + '_ {
        self.checklists.iter().flat_map(|group| group.records())
    }
}

/// Works out which records take part in a checklist tree. That's anything explicitly marked as a
/// checklist, anything with a parent, and anything that's a parent. Since every descendant of a
/// checklist record has a parent itself, this covers whole trees, bar notes.
fn tree_membership(records: &[TaskRecord]) -> Vec<bool> {
    let referenced = records
        .iter()
        .filter(|r| !r.is_note())
        .filter_map(TaskRecord::parent_id)
        .collect::<HashSet<_>>();

    records
        .iter()
        .map(|r| {
            !r.is_note()
                && (r.has_checklist_marker()
                    || r.parent_id().is_some()
                    || r.id.as_deref().is_some_and(|id| referenced.contains(id)))
        })
        .collect()
}

/// Groups flat checklist items by their list, in the order lists first appear.
fn flat_groups<'a>(records: &'a [TaskRecord], is_checklist: &[bool]) -> Vec<ChecklistGroup<'a>> {
    let mut groups: Vec<ChecklistGroup<'a>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (record, _) in records.iter().zip(is_checklist).filter(|(_, c)| **c) {
        let entry = ChecklistEntry { depth: 0, record };
        match positions.get(record.list()) {
            Some(&pos) => groups[pos].items.push(entry),
            None => {
                positions.insert(record.list(), groups.len());
                groups.push(ChecklistGroup {
                    title: record.list().to_string(),
                    anchor: record,
                    items: vec![entry],
                });
            }
        }
    }

    groups
}

/// Rebuilds the forest of checklist trees. Any checklist record without a parent in the batch is
/// a root (even with no children), and anything left unvisited after walking those (which can
/// only be part of a cycle) is promoted to a root in input order, so no record is ever lost.
fn tree_groups<'a>(records: &'a [TaskRecord], is_checklist: &[bool]) -> Vec<ChecklistGroup<'a>> {
    let mut by_id = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        if let (true, Some(id)) = (is_checklist[idx], record.id.as_deref()) {
            by_id.entry(id).or_insert(idx);
        }
    }

    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut has_parent = vec![false; records.len()];
    for (idx, record) in records.iter().enumerate() {
        if !is_checklist[idx] {
            continue;
        }
        if let Some(&parent) = record.parent_id().and_then(|p| by_id.get(p)) {
            if parent != idx {
                children.entry(parent).or_default().push(idx);
                has_parent[idx] = true;
            }
        }
    }

    let mut visited = vec![false; records.len()];
    let mut groups = Vec::new();
    for idx in 0..records.len() {
        if is_checklist[idx] && !has_parent[idx] {
            groups.push(walk_tree(records, idx, &children, &mut visited));
        }
    }
    for idx in 0..records.len() {
        if is_checklist[idx] && !visited[idx] {
            tracing::debug!(
                id = records[idx].id.as_deref().unwrap_or_default(),
                "breaking checklist cycle"
            );
            groups.push(walk_tree(records, idx, &children, &mut visited));
        }
    }

    groups
}

/// Walks the tree under the given root in pre-order. Records already visited are skipped, which
/// keeps cycles from looping forever.
fn walk_tree<'a>(
    records: &'a [TaskRecord],
    root: usize,
    children: &HashMap<usize, Vec<usize>>,
    visited: &mut [bool],
) -> ChecklistGroup<'a> {
    let mut items = Vec::new();
    let mut stack = vec![(root, 0)];
    while let Some((idx, depth)) = stack.pop() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        items.push(ChecklistEntry {
            depth,
            record: &records[idx],
        });
        stack.extend(
            children
                .get(&idx)
                .into_iter()
                .flatten()
                .rev()
                .map(|&child| (child, depth + 1)),
        );
    }

    ChecklistGroup {
        title: records[root].title().to_string(),
        anchor: &records[root],
        items,
    }
}
