use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom};

/// A channel that writes at an explicit position, like a file opened for
/// random access.
///
/// A single call may accept fewer bytes than offered. Implementations must
/// never report more than `buf.len()`.
pub trait PositionalWrite {
    /// Write some prefix of `buf` at `position`, returning how many bytes
    /// were accepted.
    fn write_at(&mut self, buf: &[u8], position: u64) -> io::Result<usize>;
}

#[cfg(unix)]
impl PositionalWrite for File {
    fn write_at(&mut self, buf: &[u8], position: u64) -> io::Result<usize> {
        std::os::unix::fs::FileExt::write_at(self, buf, position)
    }
}

#[cfg(windows)]
impl PositionalWrite for File {
    fn write_at(&mut self, buf: &[u8], position: u64) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_write(self, buf, position)
    }
}

/// In-memory channel: writes land at `position`, zero-filling any gap.
impl PositionalWrite for Vec<u8> {
    fn write_at(&mut self, buf: &[u8], position: u64) -> io::Result<usize> {
        let start = usize::try_from(position)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "position exceeds address space"))?;
        let end = start
            .checked_add(buf.len())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "write extends past address space"))?;
        if self.len() < end {
            self.resize(end, 0);
        }
        self[start..end].copy_from_slice(buf);
        Ok(buf.len())
    }
}

impl<W: PositionalWrite + ?Sized> PositionalWrite for &mut W {
    fn write_at(&mut self, buf: &[u8], position: u64) -> io::Result<usize> {
        (**self).write_at(buf, position)
    }
}

/// A reader that can skip forward without copying.
///
/// `skip` may skip fewer bytes than requested. Returning `0` does not
/// necessarily mean end of stream; callers that need certainty probe with a
/// one-byte read.
pub trait Skip: Read {
    fn skip(&mut self, n: u64) -> io::Result<u64>;
}

/// Regular files seek, clamped to their length. Pipes, FIFOs and devices
/// cannot seek, so they read through instead.
impl Skip for File {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let metadata = self.metadata()?;
        if !metadata.is_file() {
            return skip_by_reading(self, n);
        }
        let position = self.stream_position()?;
        let len = metadata.len();
        let step = n.min(len.saturating_sub(position)).min(i64::MAX as u64);
        if step > 0 {
            self.seek(SeekFrom::Current(step as i64))?;
        }
        Ok(step)
    }
}

impl<T: AsRef<[u8]>> Skip for Cursor<T> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let len = self.get_ref().as_ref().len() as u64;
        let position = self.position();
        let step = n.min(len.saturating_sub(position));
        self.set_position(position + step);
        Ok(step)
    }
}

impl Skip for &[u8] {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let step = n.min(self.len() as u64) as usize;
        *self = &self[step..];
        Ok(step as u64)
    }
}

impl<R: Read> Skip for BufReader<R> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        let buffered = self.buffer().len();
        if buffered > 0 {
            let step = n.min(buffered as u64) as usize;
            self.consume(step);
            return Ok(step as u64);
        }
        skip_by_reading(self, n)
    }
}

impl<S: Skip + ?Sized> Skip for &mut S {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        (**self).skip(n)
    }
}

/// Skip up to `n` bytes by reading and discarding them.
///
/// Suitable as the `skip` of readers with no cheaper way to advance.
pub fn skip_by_reading<R: Read + ?Sized>(reader: &mut R, n: u64) -> io::Result<u64> {
    io::copy(&mut reader.take(n), &mut io::sink())
}
