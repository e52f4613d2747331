use thiserror::Error;

/// Errors that can occur during music operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MusicError {
    #[error("The queue is empty")]
    EmptyQueue,

    #[error("Position {index} is out of range for a queue of {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Volume {0} is outside of 0.0..=1.0")]
    VolumeOutOfRange(f32),

    #[error("Wait was cancelled")]
    Cancelled,

    #[error("Playback failed: {0}")]
    PlaybackFailure(String),

    #[error("Failed to resolve track: {0}")]
    ResolutionError(String),

    #[error("Nothing is playing right now")]
    NothingPlaying,

    #[error("Not in a guild")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;
