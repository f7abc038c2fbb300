//! Audio playback control
//!
//! `PlaybackController` owns at most one decoded-audio resource at a
//! time. Installing a new clip stops and releases the previous one
//! before the new handle exists; disposal releases unconditionally. The
//! actual sound output sits behind the `Playable` seam, with a rodio
//! backend when the `audio-io` feature is enabled.

use crate::transfer::EphemeralStore;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Minimal control surface over a loaded audio clip
pub trait Playable {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn stop(&mut self);
}

/// Creates a `Playable` from decoded audio bytes and a MIME hint
pub type PlayableFactory = Box<dyn Fn(Arc<Vec<u8>>, &str) -> Result<Box<dyn Playable>>>;

/// Backend that swallows playback, for headless use and tests
pub struct NullPlayable;

impl Playable for NullPlayable {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn stop(&mut self) {}
}

/// The single live audio resource
pub struct AudioHandle {
    pub resource_url: String,
    playable: Box<dyn Playable>,
    pub is_playing: bool,
}

pub struct PlaybackController {
    store: Arc<EphemeralStore>,
    factory: PlayableFactory,
    handle: Option<AudioHandle>,
}

impl PlaybackController {
    /// Controller with the default audio backend
    #[cfg(feature = "audio-io")]
    pub fn new(store: Arc<EphemeralStore>) -> Self {
        Self::with_factory(
            store,
            Box::new(|bytes, _mime| Ok(Box::new(rodio_backend::RodioPlayable::new(bytes)?) as _)),
        )
    }

    #[cfg(not(feature = "audio-io"))]
    pub fn new(store: Arc<EphemeralStore>) -> Self {
        Self::with_factory(store, Box::new(|_bytes, _mime| Ok(Box::new(NullPlayable) as _)))
    }

    /// Controller with a custom playback backend
    pub fn with_factory(store: Arc<EphemeralStore>, factory: PlayableFactory) -> Self {
        Self {
            store,
            factory,
            handle: None,
        }
    }

    /// Install a new clip, releasing any previous one first.
    /// Returns the ephemeral URL of the installed resource.
    pub fn install(&mut self, bytes: Vec<u8>, mime: &str) -> Result<String> {
        self.dispose();

        let url = self.store.to_ephemeral_url(bytes, mime);
        let (bytes, mime) = self
            .store
            .resolve(&url)
            .expect("freshly stored resource must resolve");

        let playable = match (self.factory)(bytes, &mime) {
            Ok(playable) => playable,
            Err(e) => {
                // Release on the error path too; no orphaned resources
                self.store.release(&url);
                return Err(e);
            }
        };

        info!("Installed audio resource {}", url);
        self.handle = Some(AudioHandle {
            resource_url: url.clone(),
            playable,
            is_playing: false,
        });
        Ok(url)
    }

    /// Flip between playing and paused. No-op when nothing is installed.
    pub fn toggle_play(&mut self) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Ok(());
        };

        if handle.is_playing {
            handle.playable.pause();
            handle.is_playing = false;
        } else {
            handle.playable.play()?;
            handle.is_playing = true;
        }
        Ok(())
    }

    /// Mark playback finished without releasing the clip
    pub fn mark_stopped(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.is_playing = false;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.handle.as_ref().map(|h| h.is_playing).unwrap_or(false)
    }

    pub fn has_audio(&self) -> bool {
        self.handle.is_some()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.handle.as_ref().map(|h| h.resource_url.as_str())
    }

    /// Stop playback and release the resource. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.playable.stop();
            self.store.release(&handle.resource_url);
            debug!("Released audio resource {}", handle.resource_url);
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(feature = "audio-io")]
mod rodio_backend {
    use super::Playable;
    use crate::{EchofaceError, Result};
    use rodio::{Decoder, OutputStream, Sink};
    use std::io::Cursor;
    use std::sync::Arc;

    /// Rodio-backed playback. The output stream must outlive the sink,
    /// so both live in the handle.
    pub struct RodioPlayable {
        _stream: OutputStream,
        sink: Sink,
    }

    impl RodioPlayable {
        pub fn new(bytes: Arc<Vec<u8>>) -> Result<Self> {
            let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
                EchofaceError::Playback(format!("No output device available: {}", e))
            })?;
            let sink = Sink::try_new(&stream_handle)
                .map_err(|e| EchofaceError::Playback(format!("Failed to create sink: {}", e)))?;

            let source = Decoder::new(Cursor::new(bytes.as_ref().clone()))
                .map_err(|e| EchofaceError::Playback(format!("Unsupported audio data: {}", e)))?;
            sink.append(source);
            sink.pause();

            Ok(Self {
                _stream: stream,
                sink,
            })
        }
    }

    impl Playable for RodioPlayable {
        fn play(&mut self) -> Result<()> {
            self.sink.play();
            Ok(())
        }

        fn pause(&mut self) {
            self.sink.pause();
        }

        fn stop(&mut self) {
            self.sink.stop();
        }
    }
}
