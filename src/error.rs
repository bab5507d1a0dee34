use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid preset file {path}: {source}")]
    PresetParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode presets: {0}")]
    PresetWrite(#[from] toml::ser::Error),

    #[error("invalid composite: {0}")]
    Composite(String),

    #[error("unknown entry '{0}'")]
    UnknownEntry(String),

    #[error("preset slot {0} is empty")]
    EmptySlot(u8),

    #[error("preset slot {0} does not exist (slots are 1-4)")]
    InvalidSlot(u8),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
