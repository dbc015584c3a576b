//! Multi-document YAML files, editor round trips and confirmation prompts

use crate::infrastructure::constants::{DEFAULT_EDITOR, ENV_EDITOR};
use crate::shared::error::{CliError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Read, Write};
use std::path::Path;

/// Read every YAML document of `path` (`-` for stdin) as an entity.
pub fn read_documents<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_documents(&text)
}

pub fn parse_documents<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut entities = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        entities.push(serde_yaml::from_value(value)?);
    }
    Ok(entities)
}

/// The editor from `$EDITOR`, falling back to `vi`.
pub fn editor() -> String {
    std::env::var(ENV_EDITOR)
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Open `entity` as YAML in `editor` and parse the result.
///
/// Returns `None` when the content was left unchanged.
pub async fn edit_with<T>(editor: &str, entity: &T) -> Result<Option<T>>
where
    T: Serialize + DeserializeOwned,
{
    let original = serde_yaml::to_string(entity)?;

    let mut file = tempfile::Builder::new()
        .prefix("metal-edit-")
        .suffix(".yaml")
        .tempfile()?;
    file.write_all(original.as_bytes())?;
    file.flush()?;

    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| CliError::invalid_argument("no editor configured"))?;

    tracing::debug!(editor, path = %file.path().display(), "opening editor");
    let status = tokio::process::Command::new(program)
        .args(parts)
        .arg(file.path())
        .status()
        .await?;
    if !status.success() {
        return Err(CliError::invalid_argument(format!(
            "editor '{}' exited with {}",
            editor, status
        )));
    }

    let edited = std::fs::read_to_string(file.path())?;
    if edited == original {
        return Ok(None);
    }

    let mut documents: Vec<T> = parse_documents(&edited)?;
    if documents.len() != 1 {
        return Err(CliError::invalid_argument(format!(
            "expected exactly one document after editing, got {}",
            documents.len()
        )));
    }
    Ok(documents.pop())
}

/// Ask a yes/no question on stderr, reading the answer from stdin.
pub fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api::Project;

    const DOCS: &str = r#"
---
uuid: p-1
name: alpha
---
---
uuid: p-2
name: beta
isDefaultProject: true
"#;

    #[test]
    fn test_parse_multiple_documents() {
        let projects: Vec<Project> = parse_documents(DOCS).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "alpha");
        assert!(projects[1].is_default_project);
    }

    #[test]
    fn test_read_documents_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.yaml");
        std::fs::write(&path, DOCS).unwrap();

        let projects: Vec<Project> = read_documents(&path).unwrap();
        assert_eq!(projects[1].uuid, "p-2");
    }

    #[test]
    fn test_invalid_document() {
        let result: Result<Vec<Project>> = parse_documents("name: [unclosed");
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_unchanged_is_none() {
        let project = Project {
            uuid: "p-1".to_string(),
            name: "alpha".to_string(),
            ..Default::default()
        };
        assert_eq!(edit_with("true", &project).await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_changed_content() {
        let project = Project {
            uuid: "p-1".to_string(),
            name: "alpha".to_string(),
            ..Default::default()
        };
        let edited = edit_with("sed -i s/alpha/gamma/", &project)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.name, "gamma");
        assert_eq!(edited.uuid, "p-1");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_editor() {
        let project = Project::default();
        assert!(edit_with("false", &project).await.is_err());
    }
}
