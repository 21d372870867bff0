use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};

const INDENT: &[u8] = b"    ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Everything outside printable ASCII (including DEL) is written as
    /// `\uXXXX` escapes.
    Ascii,
    /// Non-ASCII text is written as-is.
    Utf8,
}

/// Pretty printing that escapes non-ASCII characters.
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0; 2];
        for c in fragment.chars() {
            if c.is_ascii() && c != '\x7f' {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

/// Serializes `value` as JSON indented by four spaces.
pub fn to_json<T: Serialize + ?Sized>(value: &T, encoding: Encoding) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let pretty = PrettyFormatter::with_indent(INDENT);

    match encoding {
        Encoding::Ascii => value.serialize(&mut Serializer::with_formatter(&mut out, AsciiFormatter(pretty)))?,
        Encoding::Utf8 => value.serialize(&mut Serializer::with_formatter(&mut out, pretty))?,
    }

    Ok(out)
}

/// Writes `value` to `path`, creating missing parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T, encoding: Encoding) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    let json = to_json(value, encoding)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    Ok(())
}
