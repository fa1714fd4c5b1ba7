use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::codec;
use crate::error::{SinkError, StreamConfigError};

/// A destination for encoded event records.
///
/// Implementations serialize concurrent callers internally (an exclusive
/// write region per sink, never a lock shared across unrelated sinks), so a
/// delivered record is always written whole.
pub trait Sink: Send + Sync {
    /// Delivers one complete, unframed record.
    fn write_record(&self, record: &[u8]) -> Result<(), SinkError>;

    /// Flushes buffered records; called when the stream closes.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Short description for failure reports.
    fn describe(&self) -> String;
}

/// Writes records as JSON Lines to a file opened for exclusive creation.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<std::fs::File>>,
}

impl FileSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StreamConfigError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| StreamConfigError::Destination {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, BufWriter<std::fs::File>>, SinkError> {
        self.writer.lock().map_err(|_| SinkError::Rejected {
            reason: "file sink writer lock poisoned".to_string(),
        })
    }
}

impl Sink for FileSink {
    fn write_record(&self, record: &[u8]) -> Result<(), SinkError> {
        let mut writer = self.locked()?;
        codec::write_record(&mut *writer, record)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        let mut writer = self.locked()?;
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Hands each record to an in-process callback as one undelimited buffer;
/// the caller decides framing.
pub struct CallbackSink {
    callback: Box<dyn Fn(&[u8]) + Send + Sync>,
}

impl CallbackSink {
    pub fn new(callback: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl Sink for CallbackSink {
    fn write_record(&self, record: &[u8]) -> Result<(), SinkError> {
        (self.callback)(record);
        Ok(())
    }

    fn describe(&self) -> String {
        "callback".to_string()
    }
}

/// Hands each record to a C-compatible function pointer, for hosts that load
/// this library across a dynamic boundary.
pub struct RawSink {
    callback: extern "C" fn(record: *const u8, length: usize),
}

impl RawSink {
    pub fn new(callback: extern "C" fn(*const u8, usize)) -> Self {
        Self { callback }
    }
}

impl Sink for RawSink {
    fn write_record(&self, record: &[u8]) -> Result<(), SinkError> {
        (self.callback)(record.as_ptr(), record.len());
        Ok(())
    }

    fn describe(&self) -> String {
        "raw callback".to_string()
    }
}

/// Forwards records to a tokio channel for async consumers.
#[cfg(feature = "tokio")]
pub struct ChannelSink {
    sender: tokio::sync::mpsc::UnboundedSender<Vec<u8>>,
}

#[cfg(feature = "tokio")]
impl ChannelSink {
    pub fn new(sender: tokio::sync::mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self { sender }
    }
}

#[cfg(feature = "tokio")]
impl Sink for ChannelSink {
    fn write_record(&self, record: &[u8]) -> Result<(), SinkError> {
        self.sender
            .send(record.to_vec())
            .map_err(|_| SinkError::Rejected {
                reason: "channel receiver dropped".to_string(),
            })
    }

    fn describe(&self) -> String {
        "channel".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn callback_sink_receives_undelimited_buffers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = CallbackSink::new({
            let seen = Arc::clone(&seen);
            move |record| seen.lock().unwrap().push(record.to_vec())
        });

        sink.write_record(b"{\"a\":1}").unwrap();
        sink.write_record(b"{\"b\":2}").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|record| !record.contains(&b'\n')));
    }

    #[test]
    fn raw_sink_invokes_the_function_pointer() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        static BYTES: AtomicUsize = AtomicUsize::new(0);

        extern "C" fn receive(_record: *const u8, length: usize) {
            CALLS.fetch_add(1, Ordering::SeqCst);
            BYTES.fetch_add(length, Ordering::SeqCst);
        }

        let sink = RawSink::new(receive);
        sink.write_record(b"{\"kind\":\"runStarted\"}").unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(BYTES.load(Ordering::SeqCst), 21);
    }
}
