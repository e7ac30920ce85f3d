use crate::api::UploadFile;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("{path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a regular file")]
    NotAFile(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl Attachment {
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let meta = std::fs::metadata(path).map_err(|source| AttachmentError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        if !meta.is_file() {
            return Err(AttachmentError::NotAFile(path.display().to_string()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: meta.len(),
        })
    }

    /// `"{name} ({size} bytes)"`, the detail page listing.
    pub fn describe(&self) -> String {
        format!("{} ({} bytes)", self.name, self.size)
    }
}

/// Files attached to the creation wizard.
///
/// The chips on screen and the files posted with the form are both read from
/// `files`, so removing a chip always removes the upload too.
#[derive(Debug, Clone, Default)]
pub struct Attachments {
    files: Vec<Attachment>,
}

impl Attachments {
    pub fn add(&mut self, attachment: Attachment) {
        self.files.push(attachment);
    }

    pub fn add_path(&mut self, path: &Path) -> Result<&Attachment, AttachmentError> {
        self.add(Attachment::from_path(path)?);
        Ok(&self.files[self.files.len() - 1])
    }

    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Chip labels in display order.
    pub fn chips(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn to_uploads(&self) -> Vec<UploadFile> {
        self.files
            .iter()
            .map(|f| UploadFile {
                path: f.path.clone(),
                name: f.name.clone(),
            })
            .collect()
    }
}

/// Single-file input of the detail page. Choosing again replaces the file.
#[derive(Debug, Clone, Default)]
pub struct SingleFilePick {
    pub file: Option<Attachment>,
}

impl SingleFilePick {
    pub fn choose(&mut self, path: &Path) -> Result<&Attachment, AttachmentError> {
        self.file = None;
        Ok(&*self.file.insert(Attachment::from_path(path)?))
    }

    pub fn listing(&self) -> Option<String> {
        self.file.as_ref().map(Attachment::describe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake(name: &str) -> Attachment {
        Attachment {
            path: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            size: 1,
        }
    }

    fn submitted_names(a: &Attachments) -> Vec<String> {
        a.to_uploads().into_iter().map(|u| u.name).collect()
    }

    #[test]
    fn test_chips_match_uploads_after_any_edit_sequence() {
        let mut attachments = Attachments::default();
        for name in ["a.png", "b.log", "c.pdf", "b.log"] {
            attachments.add(fake(name));
        }
        attachments.remove(1);
        attachments.add(fake("d.txt"));
        attachments.remove(0);
        assert_eq!(attachments.remove(10), None);

        let chips: Vec<String> = attachments.chips().into_iter().map(String::from).collect();
        assert_eq!(chips, vec!["c.pdf", "b.log", "d.txt"]);
        assert_eq!(submitted_names(&attachments), chips);
    }

    #[test]
    fn test_remove_every_chip_leaves_nothing_to_upload() {
        let mut attachments = Attachments::default();
        attachments.add(fake("a.png"));
        attachments.add(fake("b.png"));
        attachments.remove(0);
        attachments.remove(0);
        assert!(attachments.is_empty());
        assert!(attachments.to_uploads().is_empty());
    }

    #[test]
    fn test_add_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("informe.txt");
        std::fs::write(&path, b"12345").unwrap();

        let mut attachments = Attachments::default();
        let added = attachments.add_path(&path).unwrap();
        assert_eq!(added.name, "informe.txt");
        assert_eq!(added.size, 5);
        assert_eq!(attachments.len(), 1);
    }

    #[test]
    fn test_add_path_rejects_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut attachments = Attachments::default();

        assert!(matches!(
            attachments.add_path(&dir.path().join("missing.txt")),
            Err(AttachmentError::Unreadable { .. })
        ));
        assert!(matches!(
            attachments.add_path(dir.path()),
            Err(AttachmentError::NotAFile(_))
        ));
        assert!(attachments.is_empty());
    }

    #[test]
    fn test_single_pick_replaces_and_describes() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("uno.txt");
        let second = dir.path().join("dos.txt");
        std::fs::write(&first, b"1").unwrap();
        std::fs::write(&second, b"22").unwrap();

        let mut pick = SingleFilePick::default();
        pick.choose(&first).unwrap();
        pick.choose(&second).unwrap();
        assert_eq!(pick.listing().as_deref(), Some("dos.txt (2 bytes)"));

        assert!(pick.choose(&dir.path().join("nope")).is_err());
        assert_eq!(pick.listing(), None, "a failed pick clears the list");
    }
}
