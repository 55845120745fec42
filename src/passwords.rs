use std::collections::HashSet;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// Possible errors to occur while loading a password dictionary
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("The password list \"{0}\" was not found")]
    FileNotFound(PathBuf),
    #[error("Permission denied to read the password list \"{0}\"")]
    PermissionDenied(PathBuf),
    #[error("An I/O error occurred while reading \"{path}\": {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DictionaryError {
    fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Self::FileNotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// A set of well known, and therefore weak, passwords
///
/// Lookups ignore case, so `Password1!` is considered common if the list
/// contains `password1!`.
#[derive(Debug, Default, Clone)]
pub struct CommonPasswords(HashSet<String>);

impl CommonPasswords {
    /// Reads a newline delimited password list
    ///
    /// Surrounding whitespace is stripped from every line and blank lines are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| DictionaryError::from_io(path, e))?;

        let passwords = Self::from_reader(BufReader::new(file))
            .map_err(|e| DictionaryError::from_io(path, e))?;
        tracing::debug!(path = %path.display(), count = passwords.len(), "loaded common passwords");

        Ok(passwords)
    }

    /// Reads a newline delimited password list from any buffered reader
    pub fn from_reader(reader: impl BufRead) -> std::io::Result<Self> {
        let mut passwords = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let password = line.trim();
            if !password.is_empty() {
                passwords.insert(password.to_lowercase());
            }
        }

        Ok(Self(passwords))
    }

    /// Whether `password` is in the list, ignoring case
    pub fn contains(&self, password: &str) -> bool {
        self.0.contains(&password.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for CommonPasswords {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_lowercase).collect())
    }
}
