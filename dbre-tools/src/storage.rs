use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use crate::{DbreError, Document, Result};

/// The document a first run starts from when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<database package=""/>
"#;

/// Reads the document at `path`, or `None` when there is no file there yet.
#[instrument(skip_all)]
pub async fn read_document(path: &Path) -> Result<Option<Document>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No existing document");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Some(Document::parse(&content)?))
}

/// Reads the document at `path`, failing when it does not exist.
pub async fn load_document(path: &Path) -> Result<Document> {
    read_document(path).await?
        .ok_or_else(|| DbreError::DocumentNotFound(path.to_path_buf()))
}

/// Loads the configured template, or the built in one when none is configured.
pub async fn load_template(path: Option<&Path>) -> Result<Document> {
    match path {
        Some(path) => read_document(path).await?
            .ok_or_else(|| DbreError::TemplateNotFound(path.to_path_buf())),
        None => Document::parse(DEFAULT_TEMPLATE),
    }
}

/// Writes the document to `path`. The document is rendered before anything touches the disk,
/// and the existing file is only replaced once the new content has been written in full.
#[instrument(skip_all)]
pub async fn write_document(path: &Path, document: &Document) -> Result {
    let xml = document.to_xml_string()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = temp_path(path);

    let file = File::create(&temp_path).await?;
    let mut file = BufWriter::new(file);
    file.write_all(xml.as_bytes()).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), bytes = xml.len(), "Wrote document");

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dbre-storage-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn missing_documents() {
        let dir = test_dir();
        let path = dir.join("dbre.xml");

        assert!(read_document(&path).await.unwrap().is_none());
        assert!(matches!(load_document(&path).await, Err(DbreError::DocumentNotFound(p)) if p == path));
        assert!(matches!(load_template(Some(&path)).await, Err(DbreError::TemplateNotFound(p)) if p == path));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn default_template_is_an_empty_database() {
        let template = load_template(None).await.unwrap();

        assert_eq!(template.root().name(), "database");
        assert_eq!(template.root().attribute("package"), Some(""));
        assert!(template.root().children().is_empty());
    }

    #[tokio::test]
    async fn written_documents_read_back() {
        let dir = test_dir();
        let path = dir.join("nested").join("dbre.xml");

        let document = Document::parse(DEFAULT_TEMPLATE).unwrap();
        write_document(&path, &document).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        similar_asserts::assert_eq!(content, DEFAULT_TEMPLATE);
        assert!(!temp_path(&path).exists());

        assert_eq!(load_document(&path).await.unwrap(), document);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
