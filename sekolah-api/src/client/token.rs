use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// key the bearer token is kept under in persisted storage
pub const TOKEN_KEY: &str = "token";

/// persisted home of the bearer token. an absent or empty token means the
/// user is logged out.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;

    fn save(&self, token: &str) -> std::io::Result<()>;

    fn clear(&self) -> std::io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token<T>(token: T) -> Self
    where
        T: Into<String>
    {
        MemoryTokenStore {
            token: RwLock::new(Some(token.into()))
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        let guard = match self.token.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        guard.clone().filter(|t| !t.is_empty())
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        let mut guard = match self.token.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        *guard = Some(token.to_owned());

        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        let mut guard = match self.token.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        *guard = None;

        Ok(())
    }
}

/// json file of string keys, the token lives under `TOKEN_KEY`. other keys
/// in the file are left alone.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

type Entries = BTreeMap<String, String>;

impl FileTokenStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>
    {
        FileTokenStore {
            path: path.into()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> std::io::Result<Entries> {
        let file = match std::fs::OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => return Ok(Entries::new()),
                _ => return Err(err),
            }
        };
        let reader = std::io::BufReader::new(file);

        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    fn write_entries(&self, entries: &Entries) -> std::io::Result<()> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err),
            };
        }

        let file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)?;
        let writer = std::io::BufWriter::new(file);

        serde_json::to_writer_pretty(writer, entries)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(TOKEN_KEY).filter(|t| !t.is_empty()),
            Err(err) => {
                tracing::warn!("failed to read token file \"{}\": {}", self.path.display(), err);

                None
            }
        }
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        // a corrupt file is replaced rather than blocking login forever
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_owned(), token.to_owned());

        self.write_entries(&entries)
    }

    fn clear(&self) -> std::io::Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.remove(TOKEN_KEY);

        self.write_entries(&entries)
    }
}
