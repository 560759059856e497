use anyhow::Context;
use itertools::Itertools;

use crate::domain::ProfileTask;

/// Loads the headerless (region, url) CSV and collapses duplicate URLs,
/// keeping the first row seen.
pub fn load_tasks(path: &str) -> anyhow::Result<Vec<ProfileTask>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open input file {path}"))?;

    let mut tasks = Vec::new();
    for row in reader.deserialize() {
        let (region, url): (String, String) =
            row.with_context(|| format!("Malformed row in {path}"))?;
        tasks.push(ProfileTask { region, url });
    }

    Ok(dedupe(tasks))
}

pub fn dedupe(tasks: Vec<ProfileTask>) -> Vec<ProfileTask> {
    tasks
        .into_iter()
        .unique_by(|task| task.url.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_rows_and_collapses_duplicate_urls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "AL,https://dir.example/p/1").unwrap();
        writeln!(file, "IL,https://dir.example/p/2").unwrap();
        writeln!(file, "TX,https://dir.example/p/1").unwrap();
        file.flush().unwrap();

        let tasks = load_tasks(file.path().to_str().unwrap()).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].url, "https://dir.example/p/1");
        // first-seen row wins
        assert_eq!(tasks[0].region, "AL");
        assert_eq!(tasks[1].region, "IL");
    }

    #[test]
    fn missing_input_file_is_an_error() {
        assert!(load_tasks("/definitely/not/here.csv").is_err());
    }

    #[test]
    fn dedupe_preserves_order_of_first_occurrences() {
        let tasks = vec![
            ProfileTask {
                region: "a".into(),
                url: "u1".into(),
            },
            ProfileTask {
                region: "b".into(),
                url: "u2".into(),
            },
            ProfileTask {
                region: "c".into(),
                url: "u1".into(),
            },
        ];

        let deduped = dedupe(tasks);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].region, "a");
        assert_eq!(deduped[1].region, "b");
    }
}
