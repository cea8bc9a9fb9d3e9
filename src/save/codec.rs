// Compression codec for save files
//
// Save files hold a raw LZ4 block: no frame header and no size prefix. The
// uncompressed size is known from the cartridge, so decompression is bounded
// by the caller's buffer.

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The result does not fit in the space available
    OutputTooSmall { needed: usize, available: usize },
    /// The input is not a valid compressed block
    Corrupt(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::OutputTooSmall { needed, available } => write!(
                f,
                "Output too small: needed {} bytes, {} available",
                needed, available
            ),
            CodecError::Corrupt(reason) => write!(f, "Corrupt data: {}", reason),
        }
    }
}

impl std::error::Error for CodecError {}

/// Byte-oriented compressor
pub trait Codec {
    /// Compress `input`; fails if the result exceeds `max_output` bytes
    fn compress(&self, input: &[u8], max_output: usize) -> Result<Vec<u8>, CodecError>;

    /// Decompress `input` into `output`, returning the number of bytes written
    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError>;
}

/// LZ4 block codec
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn compress(&self, input: &[u8], max_output: usize) -> Result<Vec<u8>, CodecError> {
        let compressed = lz4_flex::block::compress(input);
        if compressed.is_empty() || compressed.len() > max_output {
            return Err(CodecError::OutputTooSmall {
                needed: compressed.len(),
                available: max_output,
            });
        }
        Ok(compressed)
    }

    fn decompress(&self, input: &[u8], output: &mut [u8]) -> Result<usize, CodecError> {
        if input.is_empty() {
            return Err(CodecError::Corrupt("empty input".to_string()));
        }
        lz4_flex::block::decompress_into(input, output)
            .map_err(|e| CodecError::Corrupt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let codec = Lz4Codec;
        let data: Vec<u8> = (0..2048u32).map(|i| (i % 7) as u8).collect();
        let compressed = codec.compress(&data, 4096).unwrap();
        assert!(compressed.len() < data.len());

        let mut out = vec![0u8; data.len()];
        assert_eq!(codec.decompress(&compressed, &mut out).unwrap(), data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn test_compress_respects_bound() {
        let codec = Lz4Codec;
        let data = vec![0xFFu8; 8192];
        let err = codec.compress(&data, 4).unwrap_err();
        assert!(matches!(err, CodecError::OutputTooSmall { available: 4, .. }));
    }

    #[test]
    fn test_empty_input_is_corrupt() {
        let codec = Lz4Codec;
        let mut out = [0u8; 16];
        assert!(matches!(
            codec.decompress(&[], &mut out),
            Err(CodecError::Corrupt(_))
        ));
    }

    #[test]
    fn test_decompress_into_short_buffer_fails() {
        let codec = Lz4Codec;
        let compressed = codec.compress(&[0xAAu8; 512], 1024).unwrap();
        let mut out = [0u8; 256];
        assert!(codec.decompress(&compressed, &mut out).is_err());
    }
}
