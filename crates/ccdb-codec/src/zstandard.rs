use zstd::stream::raw::{Decoder, Encoder, InBuffer, Operation, OutBuffer};

use crate::codec::{OutputSink, CHUNK_SIZE};
use crate::error::{CodecError, CodecResult};

pub(crate) fn check_level(level: i32) -> CodecResult<()> {
    let range = zstd::compression_level_range();
    if range.contains(&level) {
        Ok(())
    } else {
        Err(CodecError::CompressInit(format!(
            "zstd level {level} outside {}..={}",
            range.start(),
            range.end()
        )))
    }
}

pub(crate) fn compress(input: &[u8], level: i32) -> CodecResult<Vec<u8>> {
    check_level(level)?;
    let mut encoder = Encoder::new(level).map_err(|e| CodecError::CompressInit(e.to_string()))?;
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut out = Vec::new();

    for block in input.chunks(CHUNK_SIZE) {
        let mut src = InBuffer::around(block);
        while src.pos() < block.len() {
            let read_before = src.pos();
            let mut dst = OutBuffer::around(&mut chunk[..]);
            encoder
                .run(&mut src, &mut dst)
                .map_err(|e| CodecError::CompressStream(e.to_string()))?;
            if src.pos() == read_before && dst.pos() == 0 {
                return Err(CodecError::CompressStream("encoder made no progress".into()));
            }
            out.extend_from_slice(dst.as_slice());
        }
    }

    loop {
        let mut dst = OutBuffer::around(&mut chunk[..]);
        let remaining = encoder
            .finish(&mut dst, true)
            .map_err(|e| CodecError::CompressStream(e.to_string()))?;
        out.extend_from_slice(dst.as_slice());
        if remaining == 0 {
            return Ok(out);
        }
    }
}

pub(crate) fn decompress(input: &[u8], sink: &mut OutputSink) -> CodecResult<()> {
    let mut decoder = Decoder::new().map_err(|e| CodecError::DecompressInit(e.to_string()))?;
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut pos = 0usize;

    loop {
        let end = pos.saturating_add(CHUNK_SIZE).min(input.len());
        let mut src = InBuffer::around(&input[pos..end]);
        let mut dst = OutBuffer::around(&mut chunk[..]);
        let hint = decoder
            .run(&mut src, &mut dst)
            .map_err(|e| CodecError::DecompressStream(e.to_string()))?;
        let read = src.pos();
        let produced = dst.pos();
        sink.push(dst.as_slice())?;
        pos += read;

        // A zero hint means the frame is fully decoded and flushed.
        if hint == 0 {
            return Ok(());
        }
        if read == 0 && produced == 0 {
            return Err(CodecError::DecompressStream(format!(
                "frame ended without end marker after {pos} of {} input bytes",
                input.len()
            )));
        }
    }
}
