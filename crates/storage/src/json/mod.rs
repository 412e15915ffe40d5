use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::NamedTempFile;

use quiz_core::model::{Entry, VocabularyBank};

use crate::repository::{BankRepository, Storage, StorageError};

/// Bank repository backed by a single JSON file.
///
/// The file maps category names to lists of prompt→answer slot objects. Every
/// append rewrites the whole bank through a temp file in the same directory
/// followed by a rename, so a failed write cannot clobber the previous
/// contents.
#[derive(Debug, Clone)]
pub struct JsonBankRepository {
    path: PathBuf,
}

impl JsonBankRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bank(&self) -> Result<VocabularyBank, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            // A bank file that does not exist yet is an empty bank.
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(VocabularyBank::new()),
            Err(err) => return Err(StorageError::Io(err.to_string())),
        };

        let bank: VocabularyBank = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        bank.validate()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(bank)
    }

    fn write_bank(&self, bank: &VocabularyBank) -> Result<(), StorageError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;

        let temp = NamedTempFile::new_in(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, bank)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            writer.flush().map_err(|e| StorageError::Io(e.to_string()))?;
        }
        temp.persist(&self.path)
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl BankRepository for JsonBankRepository {
    async fn load_bank(&self) -> Result<VocabularyBank, StorageError> {
        self.read_bank()
    }

    async fn append_entry(&self, entry: &Entry) -> Result<(), StorageError> {
        let mut bank = self.read_bank()?;
        if bank.contains(entry) {
            return Err(StorageError::Duplicate);
        }
        bank.merge(entry);
        self.write_bank(&bank)?;
        tracing::debug!(category = %entry.category, prompt = %entry.prompt, "bank file updated");
        Ok(())
    }
}

impl Storage {
    /// Build a `Storage` backed by a JSON bank file.
    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            bank: Arc::new(JsonBankRepository::new(path)),
        }
    }
}
