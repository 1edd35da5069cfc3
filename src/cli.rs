use crate::options::{ChecklistMode, ConvertOptions};
use anyhow::{Context, Error};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Converts a TickTick backup into an Org outline and a folder of Denote-style notes.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// The TickTick CSV backup to convert.
    pub input: PathBuf,
    /// The directory to write the outline and notes into (created if it doesn't exist).
    pub output: PathBuf,

    /// Adds a random signature to every note's filename and identifier, which keeps notes with
    /// the same title and creation minute from overwriting each other.
    #[arg(short, long)]
    pub signature: bool,
    /// How checklists are recognised.
    #[arg(long)]
    pub checklists: Option<ChecklistMode>,
    /// The folder holding checklists when using `--checklists flat`.
    #[arg(long)]
    pub checklist_folder: Option<String>,
    /// Keeps archived tasks in the main outline (with the `ARCHIVED` keyword) instead of writing
    /// a separate archive document.
    #[arg(long)]
    pub no_archive: bool,
    /// A JSON file of conversion options. Flags given here take precedence over it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Prints the final report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Logs more (can be repeated).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    /// Logs nothing at all.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
impl Cli {
    /// Works out the options for this run, reading the config file if there is one and layering
    /// any flags on top.
    pub fn options(&self) -> Result<ConvertOptions, Error> {
        let mut opts = match &self.config {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => ConvertOptions::default(),
        };

        if self.signature {
            opts.signature = true;
        }
        if let Some(mode) = self.checklists {
            opts.checklists = mode;
        }
        if let Some(folder) = &self.checklist_folder {
            opts.checklist_folder = folder.clone();
        }
        if self.no_archive {
            opts.archive = false;
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tick2org").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let cli = parse(&["backup.csv", "out"]);
        assert_eq!(cli.options().unwrap(), ConvertOptions::default());
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        assert!(Cli::try_parse_from(["tick2org", "backup.csv"]).is_err());
        assert!(Cli::try_parse_from(["tick2org", "a", "b", "c"]).is_err());
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        std::fs::write(
            &config,
            r#"{ "checklists": "flat", "checklist_folder": "Lists", "notes_dir": "denote" }"#,
        )
        .unwrap();

        let cli = parse(&[
            "backup.csv",
            "out",
            "--config",
            config.to_str().unwrap(),
            "--checklist-folder",
            "Packing",
            "-s",
            "--no-archive",
        ]);
        let opts = cli.options().unwrap();
        assert_eq!(opts.checklists, ChecklistMode::Flat);
        assert_eq!(opts.checklist_folder, "Packing");
        assert_eq!(opts.notes_dir, "denote");
        assert!(opts.signature);
        assert!(!opts.archive);
    }

    #[test]
    fn unknown_config_fields_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        std::fs::write(&config, r#"{ "signatures": true }"#).unwrap();

        let cli = parse(&["in.csv", "out", "-c", config.to_str().unwrap()]);
        assert!(cli.options().is_err());
    }
}
