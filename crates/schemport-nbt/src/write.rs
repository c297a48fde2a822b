use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{BigEndian, WriteBytesExt};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::NbtError;
use crate::tag::{Compound, Tag, TagType};

/// Encode `root` as an uncompressed document named `name`.
pub fn write_root<W: Write>(w: &mut W, name: &str, root: &Compound) -> Result<(), NbtError> {
    w.write_u8(TagType::Compound.id())?;
    write_string(w, name)?;
    write_compound(w, root)
}

/// Encode `root` through a gzip encoder at `level` (0-9) and return the
/// underlying writer once the gzip trailer is written.
///
/// Tag output is buffered ahead of the encoder so the deflate stream sees
/// large chunks rather than one call per field.
pub fn write_gzip<W: Write>(
    writer: W,
    name: &str,
    root: &Compound,
    level: u32,
) -> Result<W, NbtError> {
    let mut buffered = BufWriter::new(GzEncoder::new(writer, Compression::new(level)));
    write_root(&mut buffered, name, root)?;
    let encoder = buffered.into_inner().map_err(|e| e.into_error())?;
    Ok(encoder.finish()?)
}

/// Create (or truncate) `path` and write a gzip-compressed document to it.
pub fn write_gzip_file(
    path: &Path,
    name: &str,
    root: &Compound,
    level: u32,
) -> Result<(), NbtError> {
    let file = File::create(path)?;
    let mut file = write_gzip(file, name, root, level)?;
    file.flush()?;
    Ok(())
}

fn write_compound<W: Write>(w: &mut W, compound: &Compound) -> Result<(), NbtError> {
    for (key, value) in compound.iter() {
        w.write_u8(value.tag_type().id())?;
        write_string(w, key)?;
        write_payload(w, value)?;
    }
    w.write_u8(TagType::End.id())?;
    Ok(())
}

fn write_payload<W: Write>(w: &mut W, tag: &Tag) -> Result<(), NbtError> {
    match tag {
        Tag::Byte(v) => w.write_i8(*v)?,
        Tag::Short(v) => w.write_i16::<BigEndian>(*v)?,
        Tag::Int(v) => w.write_i32::<BigEndian>(*v)?,
        Tag::Long(v) => w.write_i64::<BigEndian>(*v)?,
        Tag::Float(v) => w.write_f32::<BigEndian>(*v)?,
        Tag::Double(v) => w.write_f64::<BigEndian>(*v)?,
        Tag::ByteArray(values) => {
            write_length(w, values.len())?;
            let bytes: Vec<u8> = values.iter().map(|&b| b as u8).collect();
            w.write_all(&bytes)?;
        }
        Tag::String(s) => write_string(w, s)?,
        Tag::List(items) => {
            let elem = list_element_type(items)?;
            w.write_u8(elem.id())?;
            write_length(w, items.len())?;
            for item in items {
                write_payload(w, item)?;
            }
        }
        Tag::Compound(c) => write_compound(w, c)?,
        Tag::IntArray(values) => {
            write_length(w, values.len())?;
            for &v in values {
                w.write_i32::<BigEndian>(v)?;
            }
        }
        Tag::LongArray(values) => {
            write_length(w, values.len())?;
            for &v in values {
                w.write_i64::<BigEndian>(v)?;
            }
        }
    }
    Ok(())
}

/// Element type of a list; empty lists are typed End.
fn list_element_type(items: &[Tag]) -> Result<TagType, NbtError> {
    let Some(first) = items.first() else {
        return Ok(TagType::End);
    };
    let expected = first.tag_type();
    if let Some(other) = items.iter().find(|t| t.tag_type() != expected) {
        return Err(NbtError::HeterogeneousList {
            expected,
            found: other.tag_type(),
        });
    }
    Ok(expected)
}

fn write_length<W: Write>(w: &mut W, len: usize) -> Result<(), NbtError> {
    let len = i32::try_from(len).map_err(|_| NbtError::LengthOverflow(len))?;
    w.write_i32::<BigEndian>(len)?;
    Ok(())
}

/// Strings are stored in Java's modified UTF-8: NUL as `C0 80` and
/// supplementary characters as surrogate pairs.
fn write_string<W: Write>(w: &mut W, s: &str) -> Result<(), NbtError> {
    let bytes = cesu8::to_java_cesu8(s);
    let len = u16::try_from(bytes.len()).map_err(|_| NbtError::StringTooLong(bytes.len()))?;
    w.write_u16::<BigEndian>(len)?;
    w.write_all(&bytes)?;
    Ok(())
}
