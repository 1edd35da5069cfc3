use super::TaskState;
use crate::parse::{normalize_date, normalize_recurrence, TaskRecord, NO_PRIORITY};

/// Everything under an entry's heading is indented to line up with its title.
const ENTRY_INDENT: &str = "    ";

/// Wraps a rendered outline in the document header. `ARCHIVED` is declared as a done keyword so
/// Org treats archived entries as closed.
pub fn outline_document(title: &str, body: &str) -> String {
    format!("#+TITLE: {title}\n#+STARTUP: overview\n#+TODO: TODO | DONE ARCHIVED\n\n{body}")
}

/// Renders the given tasks as an Org outline nested by folder, then list. Folders and lists keep
/// the order they're first seen in, and tasks within a list keep their original order.
///
/// `archive_context` controls the keyword of archived tasks, which are `DONE` inside the archive
/// document and `ARCHIVED` anywhere else.
pub fn render_outline(tasks: &[(&TaskRecord, TaskState)], archive_context: bool) -> String {
    let mut out = String::new();
    for (folder, lists) in group_by_location(tasks) {
        out.push_str(&format!("* {folder}\n"));
        for (list, entries) in lists {
            out.push_str(&format!("** {list}\n"));
            for (record, state) in entries {
                render_entry(&mut out, record, state.keyword(archive_context));
            }
        }
    }

    out
}

type ListGroup<'a> = (&'a str, Vec<(&'a TaskRecord, TaskState)>);

/// Groups tasks by folder and list, keeping first-seen order at both levels.
fn group_by_location<'a>(
    tasks: &[(&'a TaskRecord, TaskState)],
) -> Vec<(&'a str, Vec<ListGroup<'a>>)> {
    let mut folders: Vec<(&'a str, Vec<ListGroup<'a>>)> = Vec::new();
    for &(record, state) in tasks {
        let folder_idx = match folders.iter().position(|(f, _)| *f == record.folder()) {
            Some(idx) => idx,
            None => {
                folders.push((record.folder(), Vec::new()));
                folders.len() - 1
            }
        };
        let lists = &mut folders[folder_idx].1;
        match lists.iter_mut().find(|(l, _)| *l == record.list()) {
            Some((_, entries)) => entries.push((record, state)),
            None => lists.push((record.list(), vec![(record, state)])),
        }
    }

    folders
}

/// Renders a single task as a third-level entry.
fn render_entry(out: &mut String, record: &TaskRecord, keyword: &str) {
    let tags = record.tags();
    if tags.is_empty() {
        out.push_str(&format!("*** {keyword} {}\n", record.title()));
    } else {
        out.push_str(&format!(
            "*** {keyword} {} :{}:\n",
            record.title(),
            tags.join(":")
        ));
    }

    for line in planning_lines(record) {
        out.push_str(&format!("{ENTRY_INDENT}{line}\n"));
    }

    // Source indentation means nothing in Org, so every line sits at the entry's indent
    for line in record.body().lines().map(str::trim).filter(|l| !l.is_empty()) {
        out.push_str(&format!("{ENTRY_INDENT}{line}\n"));
    }

    out.push_str(&format!("{ENTRY_INDENT}:PROPERTIES:\n"));
    for (name, value) in properties(record) {
        out.push_str(&format!("{ENTRY_INDENT}:{name}: {value}\n"));
    }
    out.push_str(&format!("{ENTRY_INDENT}:END:\n"));
}

/// Works out the `SCHEDULED`/`DEADLINE` lines for a task. A start and due date that are the same
/// collapse into a single scheduled line. The repeater belongs to the task, so it goes on every
/// line.
fn planning_lines(record: &TaskRecord) -> Vec<String> {
    let start = record.start_date.as_deref().and_then(normalize_date);
    let due = record.due_date.as_deref().and_then(normalize_date);
    let repeater = record.repeat.as_deref().and_then(normalize_recurrence);
    let stamp = |date: &str| match &repeater {
        Some(repeater) => format!("<{date} {repeater}>"),
        None => format!("<{date}>"),
    };

    match (start, due) {
        (Some(start), Some(due)) if start == due => vec![format!("SCHEDULED: {}", stamp(&start))],
        (start, due) => start
            .map(|start| format!("SCHEDULED: {}", stamp(&start)))
            .into_iter()
            .chain(due.map(|due| format!("DEADLINE: {}", stamp(&due))))
            .collect(),
    }
}

/// Collects the properties worth keeping from a task, in drawer order.
fn properties(record: &TaskRecord) -> Vec<(&'static str, String)> {
    let mut props = Vec::new();
    let mut push = |name: &'static str, value: Option<&str>| {
        if let Some(value) = value {
            // Drawer values have to stay on one line
            props.push((name, value.trim().replace(['\r', '\n'], " ")));
        }
    };

    push(
        "PRIORITY",
        record.priority.as_deref().filter(|p| *p != NO_PRIORITY),
    );
    push("REMINDER", record.reminder.as_deref());
    let repeat = record
        .repeat
        .as_deref()
        .map(|raw| normalize_recurrence(raw).unwrap_or_else(|| raw.to_string()));
    push("REPEAT", repeat.as_deref());
    push("CREATED", record.created.as_deref());
    push("COMPLETED", record.completed.as_deref());
    push("TIMEZONE", record.timezone.as_deref());
    push("TICKTICK_ID", record.id.as_deref());
    push("PARENT_ID", record.parent_id());
    push("CHECKLIST", record.is_flagged_checklist().then_some("t"));

    props
}
