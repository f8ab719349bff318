use nom::combinator::map;
use nom::number::complete::{le_u32, u32 as word};
use nom::number::Endianness;
use nom::sequence::tuple;
use nom::IResult;
use thiserror::Error;

pub const SPIRV_MAGIC: u32 = 0x0723_0203;

const WORD_SIZE: usize = 4;
const HEADER_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpirvHeader {
    pub endianness: Endianness,
    pub version_major: u8,
    pub version_minor: u8,
    pub generator: u32,
    pub bound: u32,
    pub schema: u32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SpirvError {
    #[error("module is {0} bytes, shorter than the SPIR-V header")]
    TooShort(usize),
    #[error("module is {0} bytes, not a whole number of 32-bit words")]
    Misaligned(usize),
    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),
    #[error("module header is ill-formed")]
    WrongFormat,
}

fn header_words(input: &[u8], endian: Endianness) -> IResult<&[u8], SpirvHeader> {
    let mut parser = map(
        tuple((word(endian), word(endian), word(endian), word(endian), word(endian))),
        |(_magic, version, generator, bound, schema): (u32, u32, u32, u32, u32)| SpirvHeader {
            endianness: endian,
            version_major: ((version >> 16) & 0xff) as u8,
            version_minor: ((version >> 8) & 0xff) as u8,
            generator,
            bound,
            schema,
        },
    );
    parser(input)
}

fn detect_endianness(input: &[u8]) -> Result<Endianness, SpirvError> {
    let (_, magic) = le_u32::<_, nom::error::Error<&[u8]>>(input)
        .map_err(|_| SpirvError::TooShort(input.len()))?;
    if magic == SPIRV_MAGIC {
        Ok(Endianness::Little)
    } else if magic.swap_bytes() == SPIRV_MAGIC {
        Ok(Endianness::Big)
    } else {
        Err(SpirvError::BadMagic(magic))
    }
}

/// Checks that `module` looks like something a Vulkan driver will accept as
/// shader code and decodes its header.
pub fn parse_header(module: &[u8]) -> Result<SpirvHeader, SpirvError> {
    if module.len() < HEADER_WORDS * WORD_SIZE {
        return Err(SpirvError::TooShort(module.len()));
    }
    if module.len() % WORD_SIZE != 0 {
        return Err(SpirvError::Misaligned(module.len()));
    }

    let endian = detect_endianness(module)?;
    let (_instructions, header) =
        header_words(module, endian).map_err(|_| SpirvError::WrongFormat)?;
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(words: &[u32], big_endian: bool) -> Vec<u8> {
        words
            .iter()
            .flat_map(|w| {
                if big_endian {
                    w.to_be_bytes()
                } else {
                    w.to_le_bytes()
                }
            })
            .collect()
    }

    // header emitted by glslc for a trivial shader
    const GLSLC_HEADER: [u32; 5] = [SPIRV_MAGIC, 0x0001_0000, 0x000d_000b, 0x0000_0019, 0];

    #[test]
    fn test_parse_header() {
        let mut words = GLSLC_HEADER.to_vec();
        words.push(0x0002_0011); // OpCapability
        words.push(1);
        let header = parse_header(&module(&words, false)).unwrap();
        assert_eq!(header.endianness, Endianness::Little);
        assert_eq!(header.version_major, 1);
        assert_eq!(header.version_minor, 0);
        assert_eq!(header.generator, 0x000d_000b);
        assert_eq!(header.bound, 25);
        assert_eq!(header.schema, 0);
    }

    #[test]
    fn test_parse_header_big_endian() {
        let header = parse_header(&module(&GLSLC_HEADER, true)).unwrap();
        assert_eq!(header.endianness, Endianness::Big);
        assert_eq!(header.version_major, 1);
        assert_eq!(header.bound, 25);
    }

    #[test]
    fn test_parse_header_too_short() {
        let bytes = module(&GLSLC_HEADER[..3], false);
        assert_eq!(parse_header(&bytes), Err(SpirvError::TooShort(12)));
        assert_eq!(parse_header(&[]), Err(SpirvError::TooShort(0)));
    }

    #[test]
    fn test_parse_header_misaligned() {
        let mut bytes = module(&GLSLC_HEADER, false);
        bytes.push(0);
        assert_eq!(parse_header(&bytes), Err(SpirvError::Misaligned(21)));
    }

    #[test]
    fn test_parse_header_bad_magic() {
        let bytes = b"#version 450\nvoid main() {}\n\0\0\0\0".to_vec();
        assert!(matches!(
            parse_header(&bytes),
            Err(SpirvError::BadMagic(_))
        ));
    }
}
