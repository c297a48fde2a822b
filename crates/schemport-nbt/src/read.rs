use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::GzDecoder;

use crate::error::NbtError;
use crate::tag::{Compound, Tag, TagType};

/// Maximum compound/list nesting accepted by the reader.
pub const MAX_DEPTH: usize = 512;

/// Gzip magic bytes (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open and decode a document from disk.
pub fn read_file(path: &Path) -> Result<(String, Compound), NbtError> {
    let file = File::open(path)?;
    read_root(file)
}

/// Decode a document, returning the root name and root compound.
///
/// Gzip input is detected by its magic bytes; anything else is read as a
/// raw tag stream.
pub fn read_root<R: Read>(reader: R) -> Result<(String, Compound), NbtError> {
    let mut reader = BufReader::new(reader);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        log::debug!("detected gzip-compressed tag stream");
        read_uncompressed(&mut GzDecoder::new(reader))
    } else {
        read_uncompressed(&mut reader)
    }
}

fn read_uncompressed<R: Read>(r: &mut R) -> Result<(String, Compound), NbtError> {
    let id = r.read_u8()?;
    if id != TagType::Compound.id() {
        return Err(NbtError::RootNotCompound(id));
    }
    let name = read_string(r)?;
    let root = read_compound(r, 1)?;
    Ok((name, root))
}

fn read_compound<R: Read>(r: &mut R, depth: usize) -> Result<Compound, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::DepthLimit(MAX_DEPTH));
    }
    let mut compound = Compound::new();
    loop {
        let id = r.read_u8()?;
        let ty = TagType::from_id(id).ok_or(NbtError::UnknownTag(id))?;
        if ty == TagType::End {
            break;
        }
        let name = read_string(r)?;
        let value = read_payload(r, ty, depth)?;
        compound.insert(name, value);
    }
    Ok(compound)
}

fn read_payload<R: Read>(r: &mut R, ty: TagType, depth: usize) -> Result<Tag, NbtError> {
    let tag = match ty {
        TagType::End => return Err(NbtError::UnknownTag(0)),
        TagType::Byte => Tag::Byte(r.read_i8()?),
        TagType::Short => Tag::Short(r.read_i16::<BigEndian>()?),
        TagType::Int => Tag::Int(r.read_i32::<BigEndian>()?),
        TagType::Long => Tag::Long(r.read_i64::<BigEndian>()?),
        TagType::Float => Tag::Float(r.read_f32::<BigEndian>()?),
        TagType::Double => Tag::Double(r.read_f64::<BigEndian>()?),
        TagType::ByteArray => {
            let len = read_length(r)?;
            let bytes = read_exact_vec(r, len)?;
            Tag::ByteArray(bytes.into_iter().map(|b| b as i8).collect())
        }
        TagType::String => Tag::String(read_string(r)?),
        TagType::List => {
            if depth + 1 > MAX_DEPTH {
                return Err(NbtError::DepthLimit(MAX_DEPTH));
            }
            let elem_id = r.read_u8()?;
            let elem = TagType::from_id(elem_id).ok_or(NbtError::UnknownTag(elem_id))?;
            let raw_len = r.read_i32::<BigEndian>()?;
            if raw_len < 0 {
                return Err(NbtError::NegativeLength(raw_len));
            }
            if elem == TagType::End && raw_len > 0 {
                return Err(NbtError::NonEmptyEndList(raw_len));
            }
            let len = raw_len as usize;
            // Capacity is bounded so a bogus length cannot force a huge allocation.
            let mut items = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                items.push(read_payload(r, elem, depth + 1)?);
            }
            Tag::List(items)
        }
        TagType::Compound => Tag::Compound(read_compound(r, depth + 1)?),
        TagType::IntArray => {
            let len = read_length(r)?;
            let mut values = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                values.push(r.read_i32::<BigEndian>()?);
            }
            Tag::IntArray(values)
        }
        TagType::LongArray => {
            let len = read_length(r)?;
            let mut values = Vec::with_capacity(len.min(4096));
            for _ in 0..len {
                values.push(r.read_i64::<BigEndian>()?);
            }
            Tag::LongArray(values)
        }
    };
    Ok(tag)
}

fn read_length<R: Read>(r: &mut R) -> Result<usize, NbtError> {
    let len = r.read_i32::<BigEndian>()?;
    if len < 0 {
        return Err(NbtError::NegativeLength(len));
    }
    Ok(len as usize)
}

fn read_exact_vec<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>, NbtError> {
    let mut buf: Vec<u8> = Vec::new();
    r.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("expected {len} bytes, got {}", buf.len()),
        )
        .into());
    }
    Ok(buf)
}

fn read_string<R: Read>(r: &mut R) -> Result<String, NbtError> {
    let len = r.read_u16::<BigEndian>()? as usize;
    let bytes = read_exact_vec(r, len)?;
    match cesu8::from_java_cesu8(&bytes) {
        Ok(s) => Ok(s.into_owned()),
        Err(_) => {
            log::debug!("malformed string of {len} bytes decoded lossily");
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
