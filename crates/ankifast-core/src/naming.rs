//! Export file naming

use crate::fingerprint::fingerprint;

/// Default prefix of export file names
pub const DEFAULT_PREFIX: &str = "export-to-anki-";
/// Default extension of export file names
pub const DEFAULT_EXTENSION: &str = "txt";

/// Naming scheme for export files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNaming {
    pub prefix: String,
    pub extension: String,
}

impl Default for FileNaming {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl FileNaming {
    /// Export file name for a note
    ///
    /// `document_name` is the note's file name with its extension. Selection
    /// exports carry the selection fingerprint so different selections of
    /// the same note get different files.
    pub fn file_name(&self, document_name: &str, selection: Option<&str>) -> String {
        match selection {
            Some(text) => format!(
                "{}{}-{}.{}",
                self.prefix,
                fingerprint(text),
                document_name,
                self.extension
            ),
            None => format!("{}{}.{}", self.prefix, document_name, self.extension),
        }
    }
}
