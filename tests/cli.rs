use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const BACKUP: &str = "\u{feff}\"Date: 2024-02-01+0000\"\n\
\"Version: 7.1\"\n\
\"Folder Name\",\"List Name\",\"Title\",\"Kind\",\"Tags\",\"Content\",\"Is Check list\",\"Start Date\",\"Due Date\",\"Reminder\",\"Repeat\",\"Priority\",\"Status\",\"Created Time\",\"Completed Time\",\"Timezone\",\"taskId\",\"parentId\"\n\
\"Work\",\"Projects\",\"Ship release\",\"TEXT\",\"release\",\"Check the changelog\",\"N\",\"2024-01-15T09:00:00+0000\",\"2024-01-15T09:00:00+0000\",\"\",\"RRULE:FREQ=WEEKLY;INTERVAL=1\",\"5\",\"0\",\"2024-01-01T08:00:00+0000\",\"\",\"UTC\",\"t1\",\"\"\n\
\"Work\",\"Projects\",\"Old plan\",\"TEXT\",\"\",\"\",\"N\",\"\",\"\",\"\",\"\",\"0\",\"2\",\"2023-05-01T08:00:00+0000\",\"2023-06-01T08:00:00+0000\",\"UTC\",\"t2\",\"\"\n\
\"Personal\",\"Journal\",\"Café thoughts\",\"NOTE\",\"ideas\",\"Some prose.\",\"N\",\"\",\"\",\"\",\"\",\"0\",\"0\",\"2024-01-10T20:15:00+0000\",\"\",\"UTC\",\"n1\",\"\"\n\
\"Personal\",\"Travel\",\"Trip\",\"TEXT\",\"\",\"\",\"N\",\"\",\"\",\"\",\"\",\"0\",\"0\",\"2024-03-01T10:00:00+0000\",\"\",\"UTC\",\"r\",\"\"\n\
\"Personal\",\"Travel\",\"Passport\",\"TEXT\",\"\",\"\",\"N\",\"\",\"\",\"\",\"\",\"0\",\"1\",\"2024-03-01T10:01:00+0000\",\"\",\"UTC\",\"c1\",\"r\"\n";

fn write_backup(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("backup.csv");
    fs::write(&path, BACKUP).unwrap();
    path
}

#[test]
fn wrong_argument_count_prints_usage() {
    Command::cargo_bin("tick2org")
        .unwrap()
        .arg("only-one.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn missing_input_fails() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("tick2org")
        .unwrap()
        .arg(dir.path().join("nope.csv"))
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn backup_without_header_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("backup.csv");
    fs::write(&input, "\"Title\",\"Kind\"\n\"a\",\"TEXT\"\n").unwrap();

    Command::cargo_bin("tick2org")
        .unwrap()
        .arg(&input)
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no header row"));
}

#[test]
fn full_conversion() {
    let dir = tempdir().unwrap();
    let input = write_backup(dir.path());
    let out = dir.path().join("out");

    Command::cargo_bin("tick2org")
        .unwrap()
        .arg(&input)
        .arg(&out)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Outline: 1 tasks"))
        .stdout(predicate::str::contains("Archive: 1 tasks"))
        .stdout(predicate::str::contains("Notes: 2 of 2 files written"));

    let outline = fs::read_to_string(out.join("org/ticktick.org")).unwrap();
    assert!(outline.contains("* Work\n** Projects\n*** TODO Ship release :release:\n"));
    assert!(outline.contains("    SCHEDULED: <2024-01-15 09:00 +1w>\n"));
    assert!(!outline.contains("DEADLINE"));
    assert!(outline.contains("    :PRIORITY: 5\n"));
    assert!(!outline.contains("Old plan"));

    let archive = fs::read_to_string(out.join("org/ticktick-archive.org")).unwrap();
    assert!(archive.contains("*** DONE Old plan\n"));

    let note = fs::read_to_string(out.join("notes/20240110T2015--cafe-thoughts__ideas.org")).unwrap();
    assert!(note.contains("#+identifier: 20240110T2015\n"));
    assert!(note.contains("Some prose.\n"));

    let checklist = fs::read_to_string(out.join("notes/20240301T1000--trip.org")).unwrap();
    assert!(checklist.contains("- [ ] Trip\n  - [X] Passport\n"));
}

#[test]
fn json_report() {
    let dir = tempdir().unwrap();
    let input = write_backup(dir.path());

    let output = Command::cargo_bin("tick2org")
        .unwrap()
        .arg(&input)
        .arg(dir.path().join("out"))
        .args(["--json", "--quiet", "--checklists", "none"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["active_tasks"], 3);
    assert_eq!(json["checklists"], 0);
    assert_eq!(json["notes_written"], 1);
}

#[test]
fn signatures_reach_filenames() {
    let dir = tempdir().unwrap();
    let input = write_backup(dir.path());
    let out = dir.path().join("out");

    Command::cargo_bin("tick2org")
        .unwrap()
        .arg(&input)
        .arg(&out)
        .args(["--signature", "--quiet"])
        .assert()
        .success();

    let names = fs::read_dir(out.join("notes"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|name| name.contains("==")));
}
