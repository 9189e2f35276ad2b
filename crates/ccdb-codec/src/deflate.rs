use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::codec::{OutputSink, CHUNK_SIZE};
use crate::error::{CodecError, CodecResult};

const MAX_LEVEL: u32 = 9;

pub(crate) fn check_level(level: i32) -> CodecResult<Compression> {
    u32::try_from(level)
        .ok()
        .filter(|l| *l <= MAX_LEVEL)
        .map(Compression::new)
        .ok_or_else(|| {
            CodecError::CompressInit(format!("zlib level {level} outside 0..={MAX_LEVEL}"))
        })
}

pub(crate) fn compress(input: &[u8], level: i32) -> CodecResult<Vec<u8>> {
    let mut stream = Compress::new(check_level(level)?, true);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut out = Vec::new();

    loop {
        let consumed = stream.total_in() as usize;
        let end = consumed.saturating_add(CHUNK_SIZE).min(input.len());
        let flush = if end == input.len() {
            FlushCompress::Finish
        } else {
            FlushCompress::None
        };

        let before = stream.total_out();
        let status = stream
            .compress(&input[consumed..end], &mut chunk, flush)
            .map_err(|e| CodecError::CompressStream(e.to_string()))?;
        let produced = (stream.total_out() - before) as usize;
        out.extend_from_slice(&chunk[..produced]);

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                if produced == 0 && stream.total_in() as usize == consumed {
                    return Err(CodecError::CompressStream(format!(
                        "stream stalled after {consumed} of {} input bytes",
                        input.len()
                    )));
                }
            }
        }
    }
}

pub(crate) fn decompress(input: &[u8], sink: &mut OutputSink) -> CodecResult<()> {
    let mut stream = Decompress::new(true);
    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let consumed = stream.total_in() as usize;
        let end = consumed.saturating_add(CHUNK_SIZE).min(input.len());

        let before = stream.total_out();
        let status = stream
            .decompress(&input[consumed..end], &mut chunk, FlushDecompress::None)
            .map_err(|e| CodecError::DecompressStream(e.to_string()))?;
        let produced = (stream.total_out() - before) as usize;
        sink.push(&chunk[..produced])?;

        match status {
            Status::StreamEnd => return Ok(()),
            Status::Ok | Status::BufError => {
                if produced == 0 && stream.total_in() as usize == consumed {
                    return Err(CodecError::DecompressStream(format!(
                        "stream ended without end marker after {consumed} of {} input bytes",
                        input.len()
                    )));
                }
            }
        }
    }
}
