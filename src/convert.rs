use crate::extractors::{
    outline_document, render_outline, ChecklistPolicy, Classification, NoteBuilder,
    NoteDescriptor, TaskState,
};
use crate::options::ConvertOptions;
use crate::parse::TaskRecord;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

const OUTLINE_TITLE: &str = "TickTick Export";
const ARCHIVE_TITLE: &str = "TickTick Archive";

/// Counts of what a conversion produced.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub active_tasks: usize,
    pub archived_tasks: usize,
    pub notes: usize,
    /// The number of checklist notes.
    pub checklists: usize,
    /// The number of records inside those checklist notes.
    pub checklist_items: usize,
}

/// Everything produced from one batch of records, before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub outline: String,
    /// The archive document, if any tasks were archived (and archiving is on).
    pub archive: Option<String>,
    /// Notes first, then checklists, each in their original order. No two share a filename.
    pub notes: Vec<NoteDescriptor>,
    pub summary: Summary,
}

/// Converts a full batch of records. `now` stands in for any missing creation dates, so with
/// signatures off this is entirely deterministic.
pub fn convert(
    records: &[TaskRecord],
    opts: &ConvertOptions,
    now: DateTime<FixedOffset>,
) -> Conversion {
    let classes = Classification::classify(records, ChecklistPolicy::from_options(opts));

    let (active, archived): (Vec<_>, Vec<_>) = classes
        .tasks
        .iter()
        .copied()
        .partition(|(_, state)| !(opts.archive && *state == TaskState::Archived));
    let outline = outline_document(OUTLINE_TITLE, &render_outline(&active, false));
    let archive = (!archived.is_empty())
        .then(|| outline_document(ARCHIVE_TITLE, &render_outline(&archived, true)));

    let mut builder = NoteBuilder::new(now, opts.signature);
    let mut notes = classes
        .notes
        .iter()
        .map(|record| builder.build_note(record))
        .collect::<Vec<_>>();
    notes.extend(
        classes
            .checklists
            .iter()
            .map(|group| builder.build_checklist(group)),
    );

    let summary = Summary {
        active_tasks: active.len(),
        archived_tasks: archived.len(),
        notes: classes.notes.len(),
        checklists: classes.checklists.len(),
        checklist_items: classes.checklist_items().count(),
    };
    tracing::info!(
        records = records.len(),
        active = summary.active_tasks,
        archived = summary.archived_tasks,
        notes = summary.notes,
        checklists = summary.checklists,
        "classified records"
    );

    Conversion {
        outline,
        archive,
        notes,
        summary,
    }
}
