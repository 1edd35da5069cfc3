//! The flat record shape of a TickTick backup. Every column is optional, and blank cells are
//! treated exactly like missing ones, so nothing downstream ever has to distinguish the two.

use std::collections::HashMap;

pub const FOLDER_COLUMN: &str = "Folder Name";
pub const LIST_COLUMN: &str = "List Name";
const TITLE_COLUMN: &str = "Title";
const KIND_COLUMN: &str = "Kind";
const TAGS_COLUMN: &str = "Tags";
const CONTENT_COLUMN: &str = "Content";
const CHECKLIST_FLAG_COLUMN: &str = "Is Check list";
const START_COLUMN: &str = "Start Date";
const DUE_COLUMN: &str = "Due Date";
const REMINDER_COLUMN: &str = "Reminder";
const REPEAT_COLUMN: &str = "Repeat";
const PRIORITY_COLUMN: &str = "Priority";
const STATUS_COLUMN: &str = "Status";
const CREATED_COLUMN: &str = "Created Time";
const COMPLETED_COLUMN: &str = "Completed Time";
const TIMEZONE_COLUMN: &str = "Timezone";
const ID_COLUMN: &str = "taskId";
const PARENT_ID_COLUMN: &str = "parentId";

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_FOLDER: &str = "Inbox";
pub const DEFAULT_LIST: &str = "Default";

/// The `Kind` value of a note.
pub const NOTE_KIND: &str = "NOTE";
/// The `Kind` value of a task explicitly created as a checklist.
pub const CHECKLIST_KIND: &str = "CHECKLIST";
/// The affirmative value of the `Is Check list` flag.
pub const CHECKLIST_FLAG: &str = "Y";
/// The status code of a completed item.
pub const DONE_STATUS: &str = "1";
/// The status code of an archived item.
pub const ARCHIVED_STATUS: &str = "2";
/// The priority value meaning "no priority".
pub const NO_PRIORITY: &str = "0";

/// A single row of the backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRecord {
    /// The kind marker (`TEXT`, `NOTE` or `CHECKLIST`).
    pub kind: Option<String>,
    pub title: Option<String>,
    /// The tri-state status code (`0` open, `1` done, `2` archived).
    pub status: Option<String>,
    pub folder: Option<String>,
    pub list: Option<String>,
    /// Comma-delimited tags, exactly as exported.
    pub tags: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    /// The recurrence rule, which may be an RRULE or free-form text.
    pub repeat: Option<String>,
    /// The free-text body. This is never trimmed.
    pub content: Option<String>,
    pub priority: Option<String>,
    pub reminder: Option<String>,
    pub timezone: Option<String>,
    pub created: Option<String>,
    pub completed: Option<String>,
    pub id: Option<String>,
    /// The identifier of another record this one hangs under, if any.
    pub parent_id: Option<String>,
    /// The raw `Is Check list` flag.
    pub checklist_flag: Option<String>,
}
impl TaskRecord {
    /// Builds a record from `(column, value)` pairs. Unknown columns are ignored, and blank
    /// values are dropped.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = fields
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_string(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect::<HashMap<String, String>>();
        let mut take = |column: &str| map.remove(column);

        Self {
            kind: take(KIND_COLUMN),
            title: take(TITLE_COLUMN),
            status: take(STATUS_COLUMN).map(|s| s.trim().to_string()),
            folder: take(FOLDER_COLUMN),
            list: take(LIST_COLUMN),
            tags: take(TAGS_COLUMN),
            start_date: take(START_COLUMN),
            due_date: take(DUE_COLUMN),
            repeat: take(REPEAT_COLUMN),
            content: take(CONTENT_COLUMN),
            priority: take(PRIORITY_COLUMN).map(|s| s.trim().to_string()),
            reminder: take(REMINDER_COLUMN),
            timezone: take(TIMEZONE_COLUMN),
            created: take(CREATED_COLUMN),
            completed: take(COMPLETED_COLUMN),
            id: take(ID_COLUMN).map(|s| s.trim().to_string()),
            parent_id: take(PARENT_ID_COLUMN).map(|s| s.trim().to_string()),
            checklist_flag: take(CHECKLIST_FLAG_COLUMN).map(|s| s.trim().to_string()),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or(DEFAULT_TITLE)
    }

    pub fn folder(&self) -> &str {
        self.folder.as_deref().map(str::trim).unwrap_or(DEFAULT_FOLDER)
    }

    pub fn list(&self) -> &str {
        self.list.as_deref().map(str::trim).unwrap_or(DEFAULT_LIST)
    }

    /// Whether this record is kind-tagged as a note.
    pub fn is_note(&self) -> bool {
        self.kind.as_deref().map(str::trim) == Some(NOTE_KIND)
    }

    /// Whether this record was flagged as a checklist by TickTick itself, either through its
    /// kind or through the `Is Check list` column.
    pub fn has_checklist_marker(&self) -> bool {
        self.kind.as_deref().map(str::trim) == Some(CHECKLIST_KIND) || self.is_flagged_checklist()
    }

    pub fn is_flagged_checklist(&self) -> bool {
        self.checklist_flag.as_deref() == Some(CHECKLIST_FLAG)
    }

    pub fn is_done(&self) -> bool {
        self.status.as_deref() == Some(DONE_STATUS)
    }

    /// The parent identifier, if this record names one.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    /// The record's tags in their outline form: trimmed, with inner whitespace replaced by
    /// underscores, and with empty entries removed.
    pub fn tags(&self) -> Vec<String> {
        self.raw_tags()
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join("_"))
            .collect()
    }

    /// The record's tags trimmed, but otherwise as exported.
    pub fn raw_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// The content with carriage returns removed.
    pub fn body(&self) -> String {
        self.content.as_deref().unwrap_or_default().replace('\r', "")
    }
}
