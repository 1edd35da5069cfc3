use super::ChecklistGroup;
use crate::parse::{
    compact_token, keywordize, parse_timestamp, slugify, TaskRecord, DEFAULT_TITLE,
    DISPLAY_FORMAT,
};
use chrono::{DateTime, FixedOffset};
use rand::Rng;
use std::collections::HashSet;

pub const NOTE_EXTENSION: &str = "org";
const SIGNATURE_LENGTH: usize = 6;
const SIGNATURE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// Characters that mark a line of content as a bullet. The ASCII ones only count when followed
/// by whitespace.
const BULLET_GLYPHS: &[char] = &['•', '◦', '▪', '▫', '‣', '·'];
const ASCII_BULLETS: &[char] = &['-', '*'];

/// A single note file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDescriptor {
    pub filename: String,
    pub content: String,
    /// The time to set as the file's modification time. This is always the date in the header.
    pub timestamp: Option<DateTime<FixedOffset>>,
}

/// What identifies a note: when it was created, and its signature if it has one (a random
/// token, a counter keeping its filename unique, or both). The filename and the in-document
/// identifier are both derived from this, so they always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteStamp {
    pub created: DateTime<FixedOffset>,
    pub signature: Option<String>,
}
impl NoteStamp {
    pub fn identifier(&self) -> String {
        match &self.signature {
            Some(signature) => format!("{}=={signature}", compact_token(&self.created)),
            None => compact_token(&self.created),
        }
    }
}

/// Builds the filename of a note: `<identifier>--<title-slug>[__<keywords>].org`. Without a
/// signature this is a pure function of its inputs.
pub fn build_filename<'t>(
    title: &str,
    tags: impl IntoIterator<Item = &'t str>,
    stamp: &NoteStamp,
) -> String {
    let mut slug = slugify(title);
    if slug.is_empty() {
        slug = slugify(DEFAULT_TITLE);
    }
    let keywords = tags
        .into_iter()
        .map(keywordize)
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>();

    let mut filename = format!("{}--{slug}", stamp.identifier());
    if !keywords.is_empty() {
        filename.push_str("__");
        filename.push_str(&keywords.join("_"));
    }
    filename.push('.');
    filename.push_str(NOTE_EXTENSION);
    filename
}

/// Hands out random signatures, never the same one twice in a batch. These have no meaning, and
/// only exist to keep filenames unique.
#[derive(Debug, Default)]
pub struct Signatures {
    issued: HashSet<String>,
}
impl Signatures {
    pub fn issue(&mut self) -> String {
        let mut rng = rand::rng();
        loop {
            let signature = (0..SIGNATURE_LENGTH)
                .map(|_| SIGNATURE_ALPHABET[rng.random_range(0..SIGNATURE_ALPHABET.len())] as char)
                .collect::<String>();
            if self.issued.insert(signature.clone()) {
                return signature;
            }
        }
    }
}

/// Builds note files from notes and checklist groups. Every filename a builder hands out is
/// unique within its batch.
pub struct NoteBuilder {
    /// The creation date of anything without a usable one of its own.
    now: DateTime<FixedOffset>,
    signatures: Option<Signatures>,
    filenames: HashSet<String>,
}
impl NoteBuilder {
    pub fn new(now: DateTime<FixedOffset>, with_signature: bool) -> Self {
        Self {
            now,
            signatures: with_signature.then(Signatures::default),
            filenames: HashSet::new(),
        }
    }

    /// Builds the note file for a record kind-tagged as a note. The body is its content.
    pub fn build_note(&mut self, record: &TaskRecord) -> NoteDescriptor {
        self.assemble(record.title(), record, &record.body())
    }

    /// Builds the note file for a checklist, with one checkbox per item.
    pub fn build_checklist(&mut self, group: &ChecklistGroup<'_>) -> NoteDescriptor {
        let mut lines = Vec::new();
        for entry in &group.items {
            let mark = if entry.record.is_done() { 'X' } else { ' ' };
            lines.push(format!(
                "{}- [{mark}] {}",
                indent(entry.depth),
                entry.record.title()
            ));
            push_content_lines(&mut lines, &entry.record.body(), entry.depth + 1);
        }

        self.assemble(&group.title, group.anchor, &lines.join("\n"))
    }

    /// Works out the stamp for a note from its source record, falling back to the current time
    /// if the record has no parseable creation date.
    fn stamp(&mut self, record: &TaskRecord) -> NoteStamp {
        let parsed = record.created.as_deref().and_then(parse_timestamp);
        if parsed.is_none() {
            tracing::debug!(title = record.title(), "no usable creation date, using now");
        }
        NoteStamp {
            created: parsed.unwrap_or(self.now),
            signature: self.signatures.as_mut().map(Signatures::issue),
        }
    }

    /// Claims a filename for the note, extending the stamp's signature with a counter until the
    /// name is free. The counter only depends on what came earlier in the batch.
    fn claim_filename(
        &mut self,
        title: &str,
        source: &TaskRecord,
        stamp: &mut NoteStamp,
    ) -> String {
        let base = stamp.signature.clone();
        let mut filename = build_filename(title, source.raw_tags(), stamp);
        let mut counter = 1;
        while self.filenames.contains(&filename) {
            counter += 1;
            stamp.signature = Some(match &base {
                Some(signature) => format!("{signature}{counter}"),
                None => counter.to_string(),
            });
            filename = build_filename(title, source.raw_tags(), stamp);
        }
        if counter > 1 {
            tracing::debug!(%filename, "filename already taken, added a counter signature");
        }
        self.filenames.insert(filename.clone());

        filename
    }

    fn assemble(&mut self, title: &str, source: &TaskRecord, body: &str) -> NoteDescriptor {
        let mut stamp = self.stamp(source);
        let filename = self.claim_filename(title, source, &mut stamp);
        let date = stamp.created.format(DISPLAY_FORMAT).to_string();
        let tags = source.tags();
        let filetags = if tags.is_empty() {
            String::new()
        } else {
            format!(":{}:", tags.join(":"))
        };

        let mut content = format!(
            "#+title:      {title}\n#+date:       [{date}]\n{}\n#+identifier: {}\n\n",
            format!("#+filetags:   {filetags}").trim_end(),
            stamp.identifier(),
        );
        let body = body.trim_end();
        if !body.trim().is_empty() {
            content.push_str(body);
            content.push_str("\n\n");
        }
        content.push_str(&format!(
            "# ---\n# Source: TickTick\n# Folder: {}\n# List: {}\n# Created: {}\n",
            source.folder(),
            source.list(),
            source.created.as_deref().map(str::trim).unwrap_or(&date),
        ));

        NoteDescriptor {
            filename,
            content,
            timestamp: Some(stamp.created),
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Adds the wrapped content of a checklist item beneath it. Lines starting with a bullet become
/// unchecked sub-items, and anything else is kept as plain text.
fn push_content_lines(lines: &mut Vec<String>, content: &str, depth: usize) {
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match strip_bullet(line) {
            Some(rest) => lines.push(format!("{}- [ ] {rest}", indent(depth))),
            None => lines.push(format!("{}{line}", indent(depth))),
        }
    }
}

fn strip_bullet(line: &str) -> Option<&str> {
    let rest = match line.strip_prefix(BULLET_GLYPHS) {
        Some(rest) => rest,
        None => line
            .strip_prefix(ASCII_BULLETS)
            .filter(|rest| rest.starts_with(char::is_whitespace))?,
    };
    let rest = rest.trim_start();
    (!rest.is_empty()).then_some(rest)
}
