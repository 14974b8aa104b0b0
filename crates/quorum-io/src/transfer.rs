use std::io::{self, Read};

use tracing::debug;

use crate::config::TransferConfig;
use crate::error::{Operation, TransferError, TransferResult};
use crate::traits::{PositionalWrite, Skip};

/// Read exactly `length` bytes into `buf[offset..offset + length]`.
///
/// Short reads are retried until the range is filled. A read that reports end
/// of stream (`Ok(0)`) first fails with [`TransferError::UnexpectedEof`];
/// the bytes already read stay in `buf` but are never reported as success.
/// Any `io::Error`, `Interrupted` included, is returned as is.
pub fn read_fully<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    offset: usize,
    length: usize,
) -> TransferResult<()> {
    let capacity = buf.len();
    let end = offset
        .checked_add(length)
        .filter(|&end| end <= capacity)
        .ok_or(TransferError::OutOfBounds {
            offset,
            length,
            capacity,
        })?;

    let mut filled = offset;
    while filled < end {
        let n = reader.read(&mut buf[filled..end])?;
        if n == 0 {
            let transferred = (filled - offset) as u64;
            debug!(requested = length, transferred, "premature EOF while reading");
            return Err(TransferError::UnexpectedEof {
                operation: Operation::Read,
                requested: length as u64,
                transferred,
            });
        }
        filled += n;
    }
    Ok(())
}

/// Write all of `buf` to `channel` starting at `position`.
///
/// Each call to [`PositionalWrite::write_at`] may accept only part of the
/// remaining bytes; the position advances by exactly what was accepted. There
/// is no retry limit: a channel that keeps accepting zero bytes keeps this
/// call looping. A range ending past `u64::MAX` is rejected with
/// `InvalidInput` before any write.
pub fn write_fully<W: PositionalWrite + ?Sized>(
    channel: &mut W,
    buf: &[u8],
    position: u64,
) -> TransferResult<()> {
    if position.checked_add(buf.len() as u64).is_none() {
        return Err(TransferError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "write range extends past u64::MAX",
        )));
    }
    let mut remaining = buf;
    let mut position = position;
    while !remaining.is_empty() {
        let written = channel.write_at(remaining, position)?.min(remaining.len());
        remaining = &remaining[written..];
        position += written as u64;
    }
    Ok(())
}

/// Skip exactly `length` bytes.
///
/// When `skip` makes no progress, a single byte is read to tell a momentarily
/// unskippable stream apart from end of stream.
pub fn skip_fully<S: Skip + ?Sized>(reader: &mut S, length: u64) -> TransferResult<()> {
    let mut remaining = length;
    while remaining > 0 {
        let mut skipped = reader.skip(remaining)?;
        if skipped == 0 {
            let mut probe = [0u8; 1];
            if reader.read(&mut probe)? == 0 {
                let transferred = length - remaining;
                debug!(requested = length, transferred, "premature EOF while skipping");
                return Err(TransferError::UnexpectedEof {
                    operation: Operation::Skip,
                    requested: length,
                    transferred,
                });
            }
            skipped = 1;
        }
        remaining -= skipped.min(remaining);
    }
    Ok(())
}

/// Read and discard everything until end of stream, using a scratch buffer of
/// `buffer_size` bytes. Returns the number of bytes discarded.
pub fn drain<R: Read + ?Sized>(reader: &mut R, buffer_size: usize) -> TransferResult<u64> {
    if buffer_size == 0 {
        return Err(TransferError::ZeroBuffer);
    }
    let mut scratch = vec![0u8; buffer_size];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut scratch)?;
        if n == 0 {
            break;
        }
        total += n as u64;
    }
    debug!(total, buffer_size, "stream drained");
    Ok(total)
}

/// [`drain`] with the buffer size taken from `config`.
pub fn drain_with<R: Read + ?Sized>(reader: &mut R, config: &TransferConfig) -> TransferResult<u64> {
    drain(reader, config.drain_buffer_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fs::OpenOptions;
    use std::io::{self, Cursor, Seek, SeekFrom, Write};

    use proptest::prelude::*;

    /// Yields at most the next scheduled chunk size per read.
    struct ChunkedReader {
        data: Cursor<Vec<u8>>,
        schedule: VecDeque<usize>,
        reads: usize,
    }

    impl ChunkedReader {
        fn new(data: Vec<u8>, schedule: &[usize]) -> Self {
            Self {
                data: Cursor::new(data),
                schedule: schedule.iter().copied().collect(),
                reads: 0,
            }
        }
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            let limit = self.schedule.pop_front().unwrap_or(buf.len()).min(buf.len());
            self.data.read(&mut buf[..limit])
        }
    }

    /// `skip` never makes progress; `read` works normally.
    struct StubbornSkipper {
        inner: Cursor<Vec<u8>>,
        skip_calls: usize,
    }

    impl Read for StubbornSkipper {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Skip for StubbornSkipper {
        fn skip(&mut self, _n: u64) -> io::Result<u64> {
            self.skip_calls += 1;
            Ok(0)
        }
    }

    /// Accepts at most `limit` bytes per write and records each call.
    struct ThrottledChannel {
        data: Vec<u8>,
        limit: usize,
        calls: Vec<(u64, usize)>,
    }

    impl PositionalWrite for ThrottledChannel {
        fn write_at(&mut self, buf: &[u8], position: u64) -> io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.data.write_at(&buf[..n], position)?;
            self.calls.push((position, n));
            Ok(n)
        }
    }

    struct FailingReader(io::ErrorKind);

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "device fault"))
        }
    }

    fn ten_bytes() -> Vec<u8> {
        (0x01u8..=0x0A).collect()
    }

    #[test]
    fn read_fully_exact_length() {
        let mut stream = Cursor::new(ten_bytes());
        let mut buf = [0u8; 10];
        read_fully(&mut stream, &mut buf, 0, 10).unwrap();
        assert_eq!(buf.to_vec(), ten_bytes());
    }

    #[test]
    fn read_fully_one_past_end_is_eof() {
        let mut stream = Cursor::new(ten_bytes());
        let mut buf = [0u8; 11];
        let err = read_fully(&mut stream, &mut buf, 0, 11).unwrap_err();
        assert!(matches!(
            err,
            TransferError::UnexpectedEof {
                operation: Operation::Read,
                requested: 11,
                transferred: 10,
            }
        ));
    }

    #[test]
    fn read_fully_assembles_short_reads() {
        let mut stream = ChunkedReader::new(ten_bytes(), &[1, 3]);
        let mut buf = [0u8; 10];
        read_fully(&mut stream, &mut buf, 0, 10).unwrap();
        assert_eq!(buf.to_vec(), ten_bytes());
        assert_eq!(stream.reads, 3);
    }

    #[test]
    fn read_fully_respects_offset() {
        let mut stream = Cursor::new(vec![7u8, 8, 9]);
        let mut buf = [0u8; 6];
        read_fully(&mut stream, &mut buf, 2, 3).unwrap();
        assert_eq!(buf, [0, 0, 7, 8, 9, 0]);
    }

    #[test]
    fn read_fully_rejects_range_outside_buffer() {
        let mut stream = Cursor::new(ten_bytes());
        let mut buf = [0u8; 4];
        let err = read_fully(&mut stream, &mut buf, 2, 3).unwrap_err();
        assert!(matches!(err, TransferError::OutOfBounds { capacity: 4, .. }));
        // Nothing was consumed.
        assert_eq!(stream.position(), 0);

        let err = read_fully(&mut stream, &mut buf, usize::MAX, 2).unwrap_err();
        assert!(matches!(err, TransferError::OutOfBounds { .. }));
    }

    #[test]
    fn read_fully_zero_length_reads_nothing() {
        let mut stream = FailingReader(io::ErrorKind::Other);
        let mut buf = [0u8; 2];
        read_fully(&mut stream, &mut buf, 1, 0).unwrap();
    }

    #[test]
    fn read_fully_propagates_io_errors() {
        for kind in [io::ErrorKind::ConnectionReset, io::ErrorKind::Interrupted] {
            let mut stream = FailingReader(kind);
            let mut buf = [0u8; 4];
            match read_fully(&mut stream, &mut buf, 0, 4).unwrap_err() {
                TransferError::Io(err) => assert_eq!(err.kind(), kind),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn write_fully_drains_through_throttled_channel() {
        let mut channel = ThrottledChannel {
            data: Vec::new(),
            limit: 2,
            calls: Vec::new(),
        };
        write_fully(&mut channel, &ten_bytes(), 0).unwrap();

        assert_eq!(channel.data, ten_bytes());
        assert_eq!(channel.calls, vec![(0, 2), (2, 2), (4, 2), (6, 2), (8, 2)]);
    }

    #[test]
    fn write_fully_starts_at_position() {
        let mut channel = ThrottledChannel {
            data: Vec::new(),
            limit: 3,
            calls: Vec::new(),
        };
        write_fully(&mut channel, b"abcd", 5).unwrap();
        assert_eq!(&channel.data[5..], b"abcd");
        assert_eq!(channel.calls, vec![(5, 3), (8, 1)]);
    }

    #[test]
    fn write_fully_propagates_channel_errors() {
        struct Closed;
        impl PositionalWrite for Closed {
            fn write_at(&mut self, _buf: &[u8], _position: u64) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "channel closed"))
            }
        }
        let err = write_fully(&mut Closed, b"x", 0).unwrap_err();
        assert!(matches!(err, TransferError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn write_fully_rejects_range_past_u64_max() {
        let mut channel = ThrottledChannel {
            data: Vec::new(),
            limit: 2,
            calls: Vec::new(),
        };
        let err = write_fully(&mut channel, b"abc", u64::MAX - 1).unwrap_err();
        match err {
            TransferError::Io(io_err) => assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(channel.calls.is_empty());

        write_fully(&mut channel, b"", u64::MAX).unwrap();
        assert!(channel.calls.is_empty());
    }

    #[test]
    fn write_fully_to_file_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segment.log");
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .unwrap();

        write_fully(&mut file, b"header", 0).unwrap();
        write_fully(&mut file, b"entry", 10).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        skip_fully(&mut file, 10).unwrap();
        let mut buf = [0u8; 5];
        read_fully(&mut file, &mut buf, 0, 5).unwrap();
        assert_eq!(&buf, b"entry");
    }

    #[test]
    fn skip_fully_falls_back_to_single_byte_reads() {
        let mut stream = StubbornSkipper {
            inner: Cursor::new(ten_bytes()),
            skip_calls: 0,
        };
        skip_fully(&mut stream, 4).unwrap();
        assert_eq!(stream.skip_calls, 4);

        let mut rest = Vec::new();
        stream.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, ten_bytes()[4..].to_vec());
    }

    #[test]
    fn skip_fully_reports_bytes_skipped_before_eof() {
        let mut stream = Cursor::new(ten_bytes());
        let err = skip_fully(&mut stream, 15).unwrap_err();
        assert!(matches!(
            err,
            TransferError::UnexpectedEof {
                operation: Operation::Skip,
                requested: 15,
                transferred: 10,
            }
        ));
        assert!(err.to_string().contains("after 10 of 15"));
    }

    #[test]
    fn skip_fully_on_file_past_end() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&[0u8; 8]).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let err = skip_fully(&mut file, 9).unwrap_err();
        assert_eq!(err.transferred(), Some(8));
    }

    #[test]
    fn drain_counts_all_bytes() {
        let mut stream = ChunkedReader::new(vec![1u8; 1000], &[7, 100, 3]);
        assert_eq!(drain(&mut stream, 64).unwrap(), 1000);
    }

    #[test]
    fn drain_rejects_zero_buffer() {
        let mut stream = Cursor::new(ten_bytes());
        assert!(matches!(drain(&mut stream, 0), Err(TransferError::ZeroBuffer)));
    }

    #[test]
    fn drain_with_uses_configured_buffer() {
        let mut stream = Cursor::new(vec![0u8; 9000]);
        let config = TransferConfig {
            drain_buffer_size: 512,
        };
        assert_eq!(drain_with(&mut stream, &config).unwrap(), 9000);
    }

    proptest! {
        #[test]
        fn read_fully_reassembles_any_chunking(
            data in proptest::collection::vec(any::<u8>(), 1..256),
            chunks in proptest::collection::vec(1usize..17, 0..32),
        ) {
            let mut stream = ChunkedReader::new(data.clone(), &chunks);
            let mut buf = vec![0u8; data.len()];
            read_fully(&mut stream, &mut buf, 0, data.len()).unwrap();
            prop_assert_eq!(buf, data);
        }

        #[test]
        fn skip_fully_lands_on_requested_byte(
            len in 1usize..200,
            skip in 0usize..200,
        ) {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut stream = Cursor::new(data);
            let result = skip_fully(&mut stream, skip as u64);
            if skip <= len {
                prop_assert!(result.is_ok());
                prop_assert_eq!(stream.position(), skip as u64);
            } else {
                prop_assert_eq!(result.unwrap_err().transferred(), Some(len as u64));
            }
        }
    }
}
