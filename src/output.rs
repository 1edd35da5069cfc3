use crate::extractors::NoteDescriptor;
use crate::options::ConvertOptions;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The two directories a conversion writes into.
#[derive(Debug, Clone)]
pub struct OutputDir {
    pub outline_dir: PathBuf,
    pub notes_dir: PathBuf,
}

/// How a batch of note writes went.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub written: usize,
    pub failed: usize,
}

impl OutputDir {
    /// Creates the outline and notes directories under the given root.
    pub fn prepare(root: &Path, opts: &ConvertOptions) -> Result<Self> {
        let dirs = Self {
            outline_dir: root.join(&opts.outline_dir),
            notes_dir: root.join(&opts.notes_dir),
        };
        for dir in [&dirs.outline_dir, &dirs.notes_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }

        Ok(dirs)
    }

    /// Writes an outline document.
    pub fn write_document(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.outline_dir.join(filename);
        fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote document");
        Ok(path)
    }

    /// Writes every note in parallel. A failed write is logged and counted, but never stops the
    /// others, and the report is only produced once every write has finished.
    pub fn write_notes(&self, notes: &[NoteDescriptor]) -> WriteReport {
        notes
            .par_iter()
            .map(|note| match self.write_note(note) {
                Ok(()) => WriteReport {
                    written: 1,
                    failed: 0,
                },
                Err(err) => {
                    tracing::warn!(filename = %note.filename, "failed to write note: {err:#}");
                    WriteReport {
                        written: 0,
                        failed: 1,
                    }
                }
            })
            .reduce(WriteReport::default, |a, b| WriteReport {
                written: a.written + b.written,
                failed: a.failed + b.failed,
            })
    }

    /// Writes a single note, then stamps it with its creation time.
    fn write_note(&self, note: &NoteDescriptor) -> Result<()> {
        let path = self.notes_dir.join(&note.filename);
        fs::write(&path, &note.content)
            .with_context(|| format!("failed to write {}", path.display()))?;

        if let Some(timestamp) = note.timestamp {
            File::options()
                .write(true)
                .open(&path)
                .and_then(|file| file.set_modified(SystemTime::from(timestamp)))
                .with_context(|| format!("failed to set modification time of {}", path.display()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::parse::{parse_timestamp, TaskRecord};

    fn note(filename: &str, timestamp: Option<&str>) -> NoteDescriptor {
        NoteDescriptor {
            filename: filename.to_string(),
            content: format!("#+title: {filename}\n"),
            timestamp: timestamp.and_then(parse_timestamp),
        }
    }

    #[test]
    fn prepare_creates_both_directories() {
        let root = tempfile::tempdir().unwrap();
        let dirs = OutputDir::prepare(root.path(), &ConvertOptions::default()).unwrap();
        assert!(dirs.outline_dir.is_dir());
        assert!(dirs.notes_dir.is_dir());
        assert_eq!(dirs.notes_dir, root.path().join("notes"));
    }

    #[test]
    fn notes_are_written_and_stamped() {
        let root = tempfile::tempdir().unwrap();
        let dirs = OutputDir::prepare(root.path(), &ConvertOptions::default()).unwrap();
        let notes = [
            note("a.org", Some("2020-02-03T04:05:00Z")),
            note("b.org", None),
        ];

        let report = dirs.write_notes(&notes);
        assert_eq!(
            report,
            WriteReport {
                written: 2,
                failed: 0
            }
        );

        let path = dirs.notes_dir.join("a.org");
        assert_eq!(fs::read_to_string(&path).unwrap(), "#+title: a.org\n");
        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(
            modified,
            SystemTime::from(parse_timestamp("2020-02-03T04:05:00Z").unwrap())
        );
    }

    #[test]
    fn failed_writes_do_not_stop_the_rest() {
        let root = tempfile::tempdir().unwrap();
        let dirs = OutputDir::prepare(root.path(), &ConvertOptions::default()).unwrap();
        let notes = [
            note("missing/dir/x.org", None),
            note("ok.org", None),
        ];

        let report = dirs.write_notes(&notes);
        assert_eq!(
            report,
            WriteReport {
                written: 1,
                failed: 1
            }
        );
        assert!(dirs.notes_dir.join("ok.org").exists());
    }

    #[test]
    fn every_counted_note_is_its_own_file() {
        let records = vec![
            TaskRecord::from_fields([("Kind", "NOTE")]),
            TaskRecord::from_fields([("Kind", "NOTE")]),
        ];
        let now = parse_timestamp("2025-06-01T12:00:00Z").unwrap();
        let conversion = convert(&records, &ConvertOptions::default(), now);

        let root = tempfile::tempdir().unwrap();
        let dirs = OutputDir::prepare(root.path(), &ConvertOptions::default()).unwrap();
        let report = dirs.write_notes(&conversion.notes);

        let on_disk = fs::read_dir(&dirs.notes_dir).unwrap().count();
        assert_eq!(report.written, 2);
        assert_eq!(report.written, on_disk);
    }
}
