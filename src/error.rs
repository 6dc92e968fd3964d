//! Error taxonomy shared by the data client, cache, audio and router.

use thiserror::Error;

/// A detail fetch failed as a unit; no partial detail is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("pokemon #{id}: http status {core} (pokemon), {species} (species)")]
    Status { id: u16, core: u16, species: u16 },

    #[error("request failed for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("http status {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// The persistent cache could not be read or written. Never fatal.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache encode error: {0}")]
    Encode(String),
}

/// Neither cry variant could be played. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("cry clip rejected: {0}")]
    Clip(String),

    #[error("no playable cry for #{id} (legacy: {legacy}; latest: {latest})")]
    Exhausted {
        id: u16,
        legacy: String,
        latest: String,
    },
}

/// The requested detail id is unusable; the caller redirects to the list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no id given")]
    Missing,

    #[error("id {0:?} is not a number")]
    NotNumeric(String),

    #[error("id {id} is outside 1..={max}")]
    OutOfRange { id: i64, max: u16 },
}
