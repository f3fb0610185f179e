use std::io::{IsTerminal, Write};

use dicer::prelude::*;

/// Rings the terminal bell on stderr for every roll.
pub struct TerminalBell;

struct BellSink {
    stderr: std::io::Stderr,
}

impl AudioBackend for TerminalBell {
    fn open(&mut self) -> Result<Box<dyn AudioSink>> {
        let stderr = std::io::stderr();
        if !stderr.is_terminal() {
            return Err(DicerError::ResourceUnavailable(
                "stderr is not a terminal".to_string(),
            ));
        }
        Ok(Box::new(BellSink { stderr }))
    }
}

impl AudioSink for BellSink {
    fn click(&mut self) -> Result<()> {
        let mut handle = self.stderr.lock();
        handle
            .write_all(b"\x07")
            .and_then(|_| handle.flush())
            .map_err(|e| DicerError::ResourceUnavailable(e.to_string()))
    }
}
