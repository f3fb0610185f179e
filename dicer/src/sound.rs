//! Best-effort roll feedback. Nothing in here may stop a roll from happening:
//! if the output cannot be opened the cue just goes quiet.

use crate::error::Result;

/// Something that reacts audibly to a roll.
pub trait SoundCue {
    fn play_roll(&mut self);
}

/// An opened audio output.
pub trait AudioSink {
    fn click(&mut self) -> Result<()>;
}

/// Opens the audio output on demand.
pub trait AudioBackend {
    fn open(&mut self) -> Result<Box<dyn AudioSink>>;
}

/// Never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundCue for Silent {
    fn play_roll(&mut self) {}
}

enum Handle {
    Pending,
    Ready(Box<dyn AudioSink>),
    Unavailable,
}

/// Acquires its sink on the first roll and keeps it for the rest of the
/// session. A failed acquisition is not retried.
pub struct AudioOutput<B: AudioBackend> {
    backend: B,
    handle: Handle,
}

impl<B: AudioBackend> AudioOutput<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handle: Handle::Pending,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.handle, Handle::Unavailable)
    }
}

impl<B: AudioBackend> SoundCue for AudioOutput<B> {
    fn play_roll(&mut self) {
        if let Handle::Pending = self.handle {
            self.handle = match self.backend.open() {
                Ok(sink) => Handle::Ready(sink),
                Err(e) => {
                    log::debug!("Roll sounds disabled: {}", e);
                    Handle::Unavailable
                }
            };
        }

        let failure = match &mut self.handle {
            Handle::Ready(sink) => sink.click().err(),
            _ => None,
        };
        if let Some(e) = failure {
            log::debug!("Roll sound failed, muting: {}", e);
            self.handle = Handle::Unavailable;
        }
    }
}

impl<B: AudioBackend> std::fmt::Debug for AudioOutput<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.handle {
            Handle::Pending => "pending",
            Handle::Ready(_) => "ready",
            Handle::Unavailable => "unavailable",
        };
        f.debug_struct("AudioOutput").field("handle", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::error::DicerError;

    struct CountingSink {
        clicks: Rc<Cell<u32>>,
        fail: bool,
    }

    impl AudioSink for CountingSink {
        fn click(&mut self) -> Result<()> {
            if self.fail {
                return Err(DicerError::ResourceUnavailable("device lost".into()));
            }
            self.clicks.set(self.clicks.get() + 1);
            Ok(())
        }
    }

    struct TestBackend {
        opens: Rc<Cell<u32>>,
        clicks: Rc<Cell<u32>>,
        available: bool,
        sink_fails: bool,
    }

    impl TestBackend {
        fn new(available: bool, sink_fails: bool) -> Self {
            Self {
                opens: Rc::default(),
                clicks: Rc::default(),
                available,
                sink_fails,
            }
        }
    }

    impl AudioBackend for TestBackend {
        fn open(&mut self) -> Result<Box<dyn AudioSink>> {
            self.opens.set(self.opens.get() + 1);
            if !self.available {
                return Err(DicerError::ResourceUnavailable("no device".into()));
            }
            Ok(Box::new(CountingSink {
                clicks: self.clicks.clone(),
                fail: self.sink_fails,
            }))
        }
    }

    #[test]
    fn test_opens_lazily_once() {
        let backend = TestBackend::new(true, false);
        let (opens, clicks) = (backend.opens.clone(), backend.clicks.clone());
        let mut output = AudioOutput::new(backend);
        assert_eq!(opens.get(), 0);

        output.play_roll();
        output.play_roll();
        assert_eq!(opens.get(), 1);
        assert_eq!(clicks.get(), 2);
        assert!(output.is_available());
    }

    #[test]
    fn test_unavailable_is_silent_and_not_retried() {
        let backend = TestBackend::new(false, false);
        let opens = backend.opens.clone();
        let mut output = AudioOutput::new(backend);
        output.play_roll();
        output.play_roll();
        assert_eq!(opens.get(), 1);
        assert!(!output.is_available());
    }

    #[test]
    fn test_failing_sink_mutes() {
        let mut output = AudioOutput::new(TestBackend::new(true, true));
        output.play_roll();
        assert!(!output.is_available());
        output.play_roll();
    }
}
