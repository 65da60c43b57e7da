//! ## flowcollect-flow::decoder
//! Reads packed raw records off a byte stream.
//!
//! There is no framing, length prefix or checksum: the next
//! [`RAW_RECORD_SIZE`] bytes are one record. A stream that ends mid-record
//! yields [`DecodeError::ShortRead`]; nothing partially decoded is returned.

use std::io::{ErrorKind, Read};

use tracing::{debug, trace};

use crate::error::DecodeError;
use crate::raw::{RawRecord, RAW_RECORD_SIZE};

/// Reads one record from a binary source, in little-endian order.
pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<RawRecord, DecodeError> {
    let mut buf = [0u8; RAW_RECORD_SIZE];
    let mut filled = 0;
    while filled < RAW_RECORD_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }
    finish(&buf, filled)
}

/// Async counterpart of [`read_from`].
#[cfg(feature = "async")]
pub async fn read_from_async<R>(reader: &mut R) -> Result<RawRecord, DecodeError>
where
    R: tokio::io::AsyncRead + Unpin + ?Sized,
{
    use tokio::io::AsyncReadExt;

    let mut buf = [0u8; RAW_RECORD_SIZE];
    let mut filled = 0;
    while filled < RAW_RECORD_SIZE {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }
    finish(&buf, filled)
}

fn finish(buf: &[u8; RAW_RECORD_SIZE], filled: usize) -> Result<RawRecord, DecodeError> {
    if filled < RAW_RECORD_SIZE {
        debug!(
            expected = RAW_RECORD_SIZE,
            actual = filled,
            "stream ended before a full record"
        );
        return Err(DecodeError::ShortRead {
            expected: RAW_RECORD_SIZE,
            actual: filled,
        });
    }
    let record = RawRecord::from_bytes(buf);
    trace!(if_index = record.key.if_index, bytes = record.metrics.bytes, "decoded raw record");
    Ok(record)
}

/// Iterates over the records of a stream until it is exhausted.
///
/// Ends cleanly when the stream stops on a record boundary. A truncated
/// trailing record is reported once as [`DecodeError::ShortRead`], after
/// which the iterator is done. I/O errors are yielded and iteration may be
/// resumed by the caller.
pub struct RecordReader<R> {
    inner: R,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<RawRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match read_from(&mut self.inner) {
            Err(e) if e.is_clean_eof() => {
                self.done = true;
                None
            }
            Err(e @ DecodeError::ShortRead { .. }) => {
                self.done = true;
                Some(Err(e))
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Direction, RecordKey, ETH_P_IPV4};
    use crate::metrics::RecordMetrics;
    use std::io::{self, Cursor};

    fn record(if_index: u32) -> RawRecord {
        RawRecord::new(
            RecordKey {
                eth_protocol: ETH_P_IPV4,
                direction: Direction::INGRESS,
                src_addr: "172.16.0.1".parse().unwrap(),
                dst_addr: "172.16.0.2".parse().unwrap(),
                src_port: 53,
                dst_port: 33000,
                protocol: 17,
                if_index,
                ..Default::default()
            },
            RecordMetrics {
                packets: 1,
                bytes: 92,
                start_mono_time_ns: 10,
                end_mono_time_ns: 10,
            },
        )
    }

    fn stream(records: &[RawRecord]) -> Vec<u8> {
        records.iter().flat_map(|r| r.to_bytes()).collect()
    }

    /// Hands out at most `chunk` bytes per read call.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::ConnectionReset, "probe went away"))
        }
    }

    #[test]
    fn test_reads_one_record() {
        let mut cursor = Cursor::new(stream(&[record(4)]));
        let decoded = read_from(&mut cursor).unwrap();
        assert_eq!(decoded, record(4));
    }

    #[test]
    fn test_short_read_is_an_error() {
        let mut bytes = stream(&[record(4)]);
        bytes.truncate(RAW_RECORD_SIZE - 1);
        let result = read_from(&mut Cursor::new(bytes));
        assert!(matches!(
            result,
            Err(DecodeError::ShortRead {
                expected: 84,
                actual: 83
            })
        ));
    }

    #[test]
    fn test_empty_stream_is_clean_eof() {
        let err = read_from(&mut io::empty()).unwrap_err();
        assert!(err.is_clean_eof());
    }

    #[test]
    fn test_io_error_is_surfaced() {
        let result = read_from(&mut Failing);
        assert!(matches!(result, Err(DecodeError::Io(e)) if e.kind() == ErrorKind::ConnectionReset));
    }

    #[test]
    fn test_fragmented_reads_assemble_record() {
        let bytes = stream(&[record(9)]);
        let mut reader = Trickle {
            data: &bytes,
            chunk: 5,
        };
        assert_eq!(read_from(&mut reader).unwrap(), record(9));
    }

    #[test]
    fn test_reader_iterates_until_eof() {
        let bytes = stream(&[record(1), record(2), record(3)]);
        let decoded: Vec<_> = RecordReader::new(Cursor::new(bytes))
            .map(|r| r.unwrap().key.if_index)
            .collect();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn test_reader_reports_truncated_tail_once() {
        let mut bytes = stream(&[record(1), record(2)]);
        bytes.truncate(RAW_RECORD_SIZE + 10);
        let mut reader = RecordReader::new(Cursor::new(bytes));
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(DecodeError::ShortRead { actual: 10, .. }))
        ));
        assert!(reader.next().is_none());
    }

    /// Fails the first read call, then serves `data`.
    struct FlakyOnce<'a> {
        failed: bool,
        data: &'a [u8],
    }

    impl Read for FlakyOnce<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(ErrorKind::TimedOut, "ring buffer poll timed out"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn test_reader_resumes_after_io_error() {
        let bytes = stream(&[record(5), record(6)]);
        let mut reader = RecordReader::new(FlakyOnce {
            failed: false,
            data: &bytes,
        });

        assert!(matches!(
            reader.next(),
            Some(Err(DecodeError::Io(e))) if e.kind() == ErrorKind::TimedOut
        ));
        assert_eq!(reader.next().unwrap().unwrap(), record(5));
        assert_eq!(reader.next().unwrap().unwrap(), record(6));
        assert!(reader.next().is_none());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_matches_sync() {
        let bytes = stream(&[record(7), record(8)]);
        let mut reader = &bytes[..];
        assert_eq!(read_from_async(&mut reader).await.unwrap(), record(7));
        assert_eq!(read_from_async(&mut reader).await.unwrap(), record(8));
        assert!(read_from_async(&mut reader).await.unwrap_err().is_clean_eof());
    }
}
