//! Cry playback: one audible clip at a time, legacy source first.

use std::io::Cursor;
use std::sync::mpsc;

use async_trait::async_trait;

use crate::config::{CryVariant, Endpoints};
use crate::error::{FetchError, PlaybackError};

const CRY_VOLUME: f32 = 0.5;

#[async_trait]
pub trait ClipSource: Send + Sync {
    async fn fetch_clip(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub trait CryHandle: Send {
    fn stop(&mut self);
    fn is_finished(&self) -> bool;
}

pub trait CryOutput: Send {
    type Handle: CryHandle;

    fn start(&mut self, clip: Vec<u8>) -> Result<Self::Handle, PlaybackError>;
}

pub struct CryPlayer<S, O: CryOutput> {
    source: S,
    output: O,
    endpoints: Endpoints,
    current: Option<O::Handle>,
}

impl<S: ClipSource, O: CryOutput> CryPlayer<S, O> {
    pub fn new(source: S, output: O, endpoints: Endpoints) -> Self {
        Self {
            source,
            output,
            endpoints,
            current: None,
        }
    }

    /// Stops whatever is playing, then tries the legacy clip and falls back
    /// to the latest one.
    pub async fn play(&mut self, id: u16) -> Result<CryVariant, PlaybackError> {
        self.stop();

        let mut failures = Vec::with_capacity(2);
        for variant in [CryVariant::Legacy, CryVariant::Latest] {
            let url = self.endpoints.cry_url(variant, id);
            let attempt = match self.source.fetch_clip(&url).await {
                Ok(clip) => self.output.start(clip),
                Err(err) => Err(PlaybackError::Clip(err.to_string())),
            };
            match attempt {
                Ok(handle) => {
                    self.current = Some(handle);
                    tracing::debug!(id, variant = variant.label(), "cry started");
                    return Ok(variant);
                }
                Err(err) => {
                    tracing::debug!(id, variant = variant.label(), error = %err, "cry attempt failed");
                    failures.push(err.to_string());
                }
            }
        }

        let latest = failures.pop().unwrap_or_default();
        let legacy = failures.pop().unwrap_or_default();
        Err(PlaybackError::Exhausted { id, legacy, latest })
    }

    /// Releases the current clip. A clip that already ended is dropped
    /// without being stopped.
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.current.take() {
            if !handle.is_finished() {
                handle.stop();
            }
        }
    }

    /// Clears the current reference once playback ends. Returns true when
    /// nothing is playing anymore.
    pub fn reap_finished(&mut self) -> bool {
        match &self.current {
            Some(handle) if handle.is_finished() => {
                self.current = None;
                true
            }
            Some(_) => false,
            None => true,
        }
    }
}

/// Speaker output. The rodio stream is not `Send`, so it lives on its own
/// thread for as long as this value does.
pub struct RodioOutput {
    handle: rodio::OutputStreamHandle,
    _keep_alive: mpsc::Sender<()>,
}

impl RodioOutput {
    pub fn open() -> Result<Self, PlaybackError> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (keep_tx, keep_rx) = mpsc::channel::<()>();
        std::thread::Builder::new()
            .name("cry-output".to_string())
            .spawn(move || match rodio::OutputStream::try_default() {
                Ok((_stream, handle)) => {
                    let _ = ready_tx.send(Ok(handle));
                    // returns once the sender side is dropped
                    let _ = keep_rx.recv();
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err.to_string()));
                }
            })
            .map_err(|err| PlaybackError::Unavailable(err.to_string()))?;

        let handle = ready_rx
            .recv()
            .map_err(|err| PlaybackError::Unavailable(err.to_string()))?
            .map_err(PlaybackError::Unavailable)?;
        Ok(Self {
            handle,
            _keep_alive: keep_tx,
        })
    }
}

impl CryOutput for RodioOutput {
    type Handle = rodio::Sink;

    fn start(&mut self, clip: Vec<u8>) -> Result<Self::Handle, PlaybackError> {
        let source = rodio::Decoder::new(Cursor::new(clip))
            .map_err(|err| PlaybackError::Clip(err.to_string()))?;
        let sink = rodio::Sink::try_new(&self.handle)
            .map_err(|err| PlaybackError::Unavailable(err.to_string()))?;
        sink.set_volume(CRY_VOLUME);
        sink.append(source);
        Ok(sink)
    }
}

impl CryHandle for rodio::Sink {
    fn stop(&mut self) {
        rodio::Sink::stop(self);
    }

    fn is_finished(&self) -> bool {
        self.empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    struct FakeSource {
        clips: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl ClipSource for FakeSource {
        async fn fetch_clip(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.clips.get(url).cloned().ok_or_else(|| FetchError::Http {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    #[derive(Clone)]
    struct FakeHandle {
        clip: Vec<u8>,
        stopped: Arc<AtomicBool>,
        finished: Arc<AtomicBool>,
    }

    impl FakeHandle {
        fn audible(&self) -> bool {
            !self.stopped.load(Ordering::SeqCst) && !self.finished.load(Ordering::SeqCst)
        }
    }

    impl CryHandle for FakeHandle {
        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
        }

        fn is_finished(&self) -> bool {
            self.finished.load(Ordering::SeqCst)
        }
    }

    #[derive(Clone, Default)]
    struct FakeOutput {
        started: Arc<Mutex<Vec<FakeHandle>>>,
    }

    impl CryOutput for FakeOutput {
        type Handle = FakeHandle;

        fn start(&mut self, clip: Vec<u8>) -> Result<FakeHandle, PlaybackError> {
            if clip.is_empty() {
                return Err(PlaybackError::Clip("empty clip".into()));
            }
            let handle = FakeHandle {
                clip,
                stopped: Arc::new(AtomicBool::new(false)),
                finished: Arc::new(AtomicBool::new(false)),
            };
            self.started.lock().unwrap().push(handle.clone());
            Ok(handle)
        }
    }

    fn endpoints() -> Endpoints {
        Endpoints::new("http://api", "http://art", "http://legacy", "http://latest")
    }

    fn player(clips: &[(&str, &str)]) -> (CryPlayer<FakeSource, FakeOutput>, FakeOutput) {
        let source = FakeSource {
            clips: clips
                .iter()
                .map(|(url, body)| (url.to_string(), body.as_bytes().to_vec()))
                .collect(),
        };
        let output = FakeOutput::default();
        (CryPlayer::new(source, output.clone(), endpoints()), output)
    }

    #[tokio::test]
    async fn newer_play_silences_the_previous_clip() {
        let (mut player, output) = player(&[
            ("http://legacy/5.ogg", "five"),
            ("http://legacy/6.ogg", "six"),
        ]);

        player.play(5).await.unwrap();
        player.play(6).await.unwrap();

        let started = output.started.lock().unwrap();
        assert_eq!(started.len(), 2);
        assert!(!started[0].audible());
        let audible: Vec<_> = started.iter().filter(|h| h.audible()).collect();
        assert_eq!(audible.len(), 1);
        assert_eq!(audible[0].clip, b"six");
    }

    #[tokio::test]
    async fn falls_back_to_latest_clip() {
        let (mut player, output) = player(&[("http://latest/7.ogg", "seven")]);
        assert_eq!(player.play(7).await, Ok(CryVariant::Latest));
        assert!(!player.reap_finished());
        assert_eq!(output.started.lock().unwrap()[0].clip, b"seven");
    }

    #[tokio::test]
    async fn undecodable_legacy_clip_also_falls_back() {
        let (mut player, _) = player(&[
            ("http://legacy/8.ogg", ""),
            ("http://latest/8.ogg", "eight"),
        ]);
        assert_eq!(player.play(8).await, Ok(CryVariant::Latest));
    }

    #[tokio::test]
    async fn both_sources_failing_is_reported() {
        let (mut player, output) = player(&[]);
        let err = player.play(9).await.unwrap_err();
        assert!(matches!(err, PlaybackError::Exhausted { id: 9, .. }));
        assert!(player.reap_finished());
        assert!(output.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn finished_clip_is_released_without_stopping() {
        let (mut player, output) = player(&[
            ("http://legacy/1.ogg", "one"),
            ("http://legacy/2.ogg", "two"),
        ]);
        player.play(1).await.unwrap();
        assert!(!player.reap_finished());

        output.started.lock().unwrap()[0]
            .finished
            .store(true, Ordering::SeqCst);
        assert!(player.reap_finished());

        player.play(2).await.unwrap();
        assert!(!output.started.lock().unwrap()[0].stopped.load(Ordering::SeqCst));
    }
}
