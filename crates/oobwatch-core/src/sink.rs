//! Output sink duplicating every rendered unit to the console and, when
//! configured, to an output file.
//!
//! Both destinations sit behind their own mutex: the polling collaborator may
//! invoke the reporting callback concurrently, and a unit must never be
//! interleaved with another one.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Console plus optional file destination for rendered units.
pub struct OutputSink {
    console: Mutex<Box<dyn Write + Send>>,
    file: Mutex<Option<File>>,
    closed: AtomicBool,
}

impl OutputSink {
    /// Create a sink writing to stdout, mirroring to `path` when given.
    ///
    /// The file is created, or truncated if it exists.
    pub fn create(path: Option<&Path>) -> Result<Self> {
        Self::with_console(Box::new(io::stdout()), path)
    }

    /// Create a sink with a custom console writer.
    pub fn with_console(console: Box<dyn Write + Send>, path: Option<&Path>) -> Result<Self> {
        let file = path
            .map(|p| {
                File::create(p).map_err(|source| Error::OutputFile {
                    path: p.to_path_buf(),
                    source,
                })
            })
            .transpose()?;
        if let Some(p) = path {
            debug!(path = %p.display(), "Output file opened");
        }
        Ok(Self {
            console: Mutex::new(console),
            file: Mutex::new(file),
            closed: AtomicBool::new(false),
        })
    }

    /// Write one unit followed by a line separator to every destination.
    ///
    /// A failure on one destination is logged and does not prevent the write
    /// to the other. After [`close`](Self::close) this is a no-op.
    pub fn emit(&self, unit: &str) {
        if self.is_closed() {
            debug!("Output sink closed, dropping unit");
            return;
        }

        {
            let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = write_unit(&mut *console, unit) {
                warn!(error = %e, "Failed to write to console");
            }
        }

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(f) = file.as_mut()
            && let Err(e) = write_unit(f, unit)
        {
            warn!(error = %e, "Failed to write to output file");
        }
    }

    /// Flush and release the output file. Later `emit` calls are dropped.
    pub fn close(&self) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        self.closed.store(true, Ordering::SeqCst);
        if let Some(mut f) = file.take()
            && let Err(e) = f.flush()
        {
            warn!(error = %e, "Failed to flush output file");
        }
        let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = console.flush() {
            warn!(error = %e, "Failed to flush console");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Whether units are mirrored to a file.
    pub fn has_file(&self) -> bool {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

fn write_unit(w: &mut dyn Write, unit: &str) -> io::Result<()> {
    w.write_all(unit.as_bytes())?;
    w.write_all(b"\n")?;
    w.flush()
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink")
            .field("has_file", &self.has_file())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
