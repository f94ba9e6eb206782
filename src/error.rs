use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Prompt name must not be empty")]
    EmptyName,

    #[error("A prompt with id '{0}' already exists")]
    DuplicateId(String),

    #[error("No prompt with id or name '{0}'")]
    UnknownPrompt(String),

    #[error("Could not find config directory")]
    NoConfigDir,

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Could not open {url}: {source}")]
    OpenLink {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
