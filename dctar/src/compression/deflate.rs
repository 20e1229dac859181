use super::Format;
use crate::error::{CodecError, Result};
use crate::util;
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use tracing::trace;

/// Appends the finished DEFLATE stream for `input` to `out`.
///
/// With `zlib_header` set the stream is zlib-framed (header and Adler32
/// trailer), otherwise it is raw DEFLATE.
pub fn compress_into(input: &[u8], zlib_header: bool, out: &mut Vec<u8>) -> Result<()> {
    let mut stream = Compress::new(Compression::default(), zlib_header);
    out.try_reserve(util::compress_bound(input.len()))?;

    loop {
        let (total_in, total_out) = (stream.total_in(), stream.total_out());
        let status = stream
            .compress_vec(&input[total_in as usize..], out, FlushCompress::Finish)
            .map_err(|err| CodecError::Resource(err.to_string()))?;

        if status == Status::StreamEnd {
            return Ok(());
        }

        if out.len() == out.capacity() {
            trace!(capacity = out.capacity(), "growing compression buffer");
            util::grow(out, usize::MAX)?;
        } else if stream.total_in() == total_in && stream.total_out() == total_out {
            return Err(CodecError::Resource("compressor made no progress".into()));
        }
    }
}

/// Inflates one DEFLATE stream from the front of `input`, appending the
/// decoded bytes to `out`, and returns how many input bytes it consumed.
///
/// `out` may already hold data; `max_output_len` bounds its total length.
pub fn decompress_into(
    input: &[u8],
    zlib_header: bool,
    format: Format,
    out: &mut Vec<u8>,
    max_output_len: usize,
) -> Result<usize> {
    let mut stream = Decompress::new(zlib_header);
    let ceiling = max_output_len.saturating_add(1);
    let room = ceiling.saturating_sub(out.len());
    out.try_reserve_exact(util::initial_inflate_capacity(input.len(), room))?;

    loop {
        let (total_in, total_out) = (stream.total_in(), stream.total_out());
        let status = stream
            .decompress_vec(&input[total_in as usize..], out, FlushDecompress::None)
            .map_err(|err| CodecError::corruption(format, err.to_string()))?;

        if out.len() > max_output_len {
            return Err(CodecError::SizeLimit {
                limit: max_output_len,
            });
        }

        if status == Status::StreamEnd {
            return Ok(stream.total_in() as usize);
        }

        if out.len() == out.capacity() {
            trace!(capacity = out.capacity(), "growing decompression buffer");
            util::grow(out, ceiling)?;
        } else if stream.total_in() == total_in && stream.total_out() == total_out {
            // Room left for output and nothing consumed: the input ran out
            // before the end-of-stream marker.
            return Err(CodecError::truncated(format));
        }
    }
}
