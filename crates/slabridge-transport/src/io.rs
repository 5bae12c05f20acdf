use std::io::{ErrorKind, Write};

use crate::error::{Result, TransportError};

/// Write every byte of `buf` to `inner` and flush it (blocking).
///
/// `Interrupted` and `WouldBlock` are retried. A write that accepts zero
/// bytes means the device went away and is reported as
/// [`TransportError::ConnectionClosed`]. Returns the number of bytes written,
/// which is always `buf.len()` on success.
pub fn write_all_retrying<W: Write + ?Sized>(inner: &mut W, buf: &[u8]) -> Result<usize> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match inner.write(&buf[offset..]) {
            Ok(0) => return Err(TransportError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    loop {
        match inner.flush() {
            Ok(()) => return Ok(offset),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn writes_whole_buffer() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let n = write_all_retrying(&mut cursor, b"@SH\0\0\0\0\xdb").unwrap();
        assert_eq!(n, 8);
        assert_eq!(cursor.into_inner(), b"@SH\0\0\0\0\xdb");
    }

    #[test]
    fn empty_buffer_writes_nothing() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert_eq!(write_all_retrying(&mut cursor, b"").unwrap(), 0);
        assert!(cursor.into_inner().is_empty());
    }

    #[test]
    fn flush_propagates() {
        let mut sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);

        write_all_retrying(&mut sink, b"x").unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn partial_writes_are_continued() {
        let mut sink = OneByteWriter::default();
        let n = write_all_retrying(&mut sink, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(n, 8);
        assert_eq!(sink.data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(sink.calls, 8);
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let mut sink = FlakyWriter::new(ErrorKind::Interrupted);
        write_all_retrying(&mut sink, b"retry").unwrap();
        assert_eq!(sink.data, b"retry");
    }

    #[test]
    fn handles_would_block_write_and_flush() {
        let mut sink = FlakyWriter::new(ErrorKind::WouldBlock);
        write_all_retrying(&mut sink, b"retry").unwrap();
        assert_eq!(sink.data, b"retry");
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let err = write_all_retrying(&mut ZeroWriter, b"x").unwrap_err();
        assert!(matches!(err, TransportError::ConnectionClosed));
    }

    #[test]
    fn other_io_errors_surface() {
        let mut sink = FlakyWriter::new(ErrorKind::BrokenPipe);
        let err = write_all_retrying(&mut sink, b"x").unwrap_err();
        assert!(matches!(err, TransportError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct OneByteWriter {
        data: Vec<u8>,
        calls: usize,
    }

    impl Write for OneByteWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            self.data.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Fails the first write and the first flush with `kind`.
    struct FlakyWriter {
        kind: ErrorKind,
        wrote_once: bool,
        flushed_once: bool,
        data: Vec<u8>,
    }

    impl FlakyWriter {
        fn new(kind: ErrorKind) -> Self {
            Self {
                kind,
                wrote_once: false,
                flushed_once: false,
                data: Vec::new(),
            }
        }
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(self.kind));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flushed_once {
                self.flushed_once = true;
                return Err(std::io::Error::from(self.kind));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
