//! Per-guild playback orchestration.
//!
//! Everything in here is independent of the voice transport: the controller
//! only talks to the outside world through the traits in [`sink`], which the
//! songbird adapters in `commands::music::utils` implement.

/// `MusicError` and the `MusicResult` alias shared by the core and the commands.
pub mod error;
/// The per-guild background state machine.
pub mod controller;
/// Process-wide map of guild id to controller.
pub mod registry;
/// Traits for the audio sink, voice connection and notifier seams.
pub mod sink;
/// Immutable track metadata.
pub mod track;
/// The blocking, shuffleable queue of pending tracks.
pub mod track_queue;

pub use controller::{ControllerParts, PlaybackController, PlayerPhase, SkipOutcome};
pub use error::{MusicError, MusicResult};
pub use registry::MusicManager;
pub use sink::{AudioSink, Notifier, PlaybackCompletion, PlaybackOutcome, VoiceConnection};
pub use track::TrackMetadata;
pub use track_queue::{QueuePage, TrackQueue};
