use clap::ValueEnum;
use serde::Deserialize;

/// How records that form checklists are pulled out of the task stream.
#[derive(Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistMode {
    /// Every record that isn't a note is an ordinary task.
    None,
    /// Records in the checklist folder become one note per list, with every item a sibling.
    Flat,
    /// Records linked through `parentId` (or marked as checklists) become one note per tree.
    #[default]
    Tree,
}

/// Everything that controls a single conversion. This can be read from a JSON file, and any
/// missing fields take their defaults.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    /// Whether to add a random signature to note filenames and identifiers.
    pub signature: bool,
    pub checklists: ChecklistMode,
    /// The folder holding checklists under [`ChecklistMode::Flat`].
    pub checklist_folder: String,
    /// Whether archived tasks go into their own document. If not, they stay in the main outline
    /// with the `ARCHIVED` keyword.
    pub archive: bool,
    /// The subdirectory of the output directory for outline documents.
    pub outline_dir: String,
    /// The subdirectory of the output directory for note files.
    pub notes_dir: String,
    pub outline_file: String,
    pub archive_file: String,
}
impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            signature: false,
            checklists: ChecklistMode::default(),
            checklist_folder: "Checklists".to_string(),
            archive: true,
            outline_dir: "org".to_string(),
            notes_dir: "notes".to_string(),
            outline_file: "ticktick.org".to_string(),
            archive_file: "ticktick-archive.org".to_string(),
        }
    }
}
