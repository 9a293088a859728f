//! Embedded `!AvaloniaResources` index reader.
//!
//! Blob layout:
//!
//! ```text
//! i32 LE   index length N
//! N bytes  index: i32 version, then
//!            v1: XML list of AvaloniaResourcesIndexEntry {Path, Offset, Size}
//!            v2: i32 count, count × (7-bit-prefixed UTF-8 path, i32 offset, i32 size)
//! ...      resource data; entry offsets are relative to byte 4 + N
//! ```
//!
//! The `/!AvaloniaResourceXamlInfo` entry is itself an XML document mapping
//! compiled class names to the markup file they were built from.

use super::error::ResourceIndexError;
use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::Event;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::io::Read;

/// Manifest resource holding the index.
pub const AVALONIA_RESOURCES: &str = "!AvaloniaResources";

/// Index entry mapping compiled classes to markup paths.
pub const XAML_INFO_PATH: &str = "/!AvaloniaResourceXamlInfo";

const V1_ENTRY: &[u8] = b"AvaloniaResourcesIndexEntry";
const XAML_INFO_PAIR: &[u8] = b"KeyValueOfstringstring";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Absolute path inside the library, e.g. `/Assets/logo.png`.
    pub path: SmolStr,
    pub offset: u32,
    pub size: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    pub entries: Vec<ResourceEntry>,
    /// Class full name → markup resource path.
    pub xaml_info: IndexMap<SmolStr, SmolStr>,
}

impl ResourceIndex {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resource paths, excluding the XAML info entry.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|e| e.path.as_str())
            .filter(|p| *p != XAML_INFO_PATH)
    }

    pub fn entry(&self, path: &str) -> Option<&ResourceEntry> {
        self.entries.iter().find(|e| e.path == path)
    }
}

/// Read a whole resource blob from `reader`.
pub fn read_resource_index(mut reader: impl Read) -> Result<ResourceIndex, ResourceIndexError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_resource_index(&data)
}

pub fn parse_resource_index(data: &[u8]) -> Result<ResourceIndex, ResourceIndexError> {
    let mut blob = ByteReader::new(data);
    let index_len = blob.read_len()?;
    let index = blob.take(index_len)?;
    let data_start = blob.pos;

    let mut header = ByteReader::new(index);
    let entries = match header.read_i32()? {
        1 => read_v1_entries(header.rest())?,
        2 => read_v2_entries(&mut header)?,
        version => return Err(ResourceIndexError::UnsupportedVersion(version)),
    };

    let mut xaml_info = IndexMap::new();
    if let Some(info) = entries.iter().find(|e| e.path == XAML_INFO_PATH) {
        let start = data_start + info.offset as usize;
        let end = start + info.size as usize;
        let bytes = data
            .get(start..end)
            .ok_or(ResourceIndexError::Truncated(data.len()))?;
        for mut pair in xml_records(bytes, XAML_INFO_PAIR)? {
            if let (Some(class), Some(path)) = (pair.remove("Key"), pair.remove("Value")) {
                xaml_info.insert(SmolStr::new(class), SmolStr::new(path));
            }
        }
    }

    Ok(ResourceIndex { entries, xaml_info })
}

fn read_v1_entries(xml: &[u8]) -> Result<Vec<ResourceEntry>, ResourceIndexError> {
    let mut entries = Vec::new();
    for mut record in xml_records(xml, V1_ENTRY)? {
        let Some(path) = record.remove("Path") else {
            continue;
        };
        entries.push(ResourceEntry {
            path: SmolStr::new(path),
            offset: parse_u32(record.get("Offset"))?,
            size: parse_u32(record.get("Size"))?,
        });
    }
    Ok(entries)
}

fn parse_u32(field: Option<&String>) -> Result<u32, ResourceIndexError> {
    let text = field.map(|s| s.trim()).unwrap_or("0");
    let value: i64 = text
        .parse()
        .map_err(|_| ResourceIndexError::xml(format!("invalid number '{text}'")))?;
    u32::try_from(value).map_err(|_| ResourceIndexError::NegativeLength(value as i32))
}

fn read_v2_entries(header: &mut ByteReader<'_>) -> Result<Vec<ResourceEntry>, ResourceIndexError> {
    let count = header.read_len()?;
    let mut entries = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        let path = header.read_string()?;
        let offset = header.read_len()? as u32;
        let size = header.read_len()? as u32;
        entries.push(ResourceEntry {
            path: SmolStr::new(path),
            offset,
            size,
        });
    }
    Ok(entries)
}

/// Collect the leaf-element texts of every `record` element.
fn xml_records(
    xml: &[u8],
    record: &[u8],
) -> Result<Vec<FxHashMap<String, String>>, ResourceIndexError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut records = Vec::new();
    let mut current: Option<FxHashMap<String, String>> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if name.as_ref() == record {
                    current = Some(FxHashMap::default());
                } else if current.is_some() {
                    field = Some(String::from_utf8_lossy(name.as_ref()).into_owned());
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(fields), Some(name)) = (current.as_mut(), field.as_ref()) {
                    let text = t
                        .unescape()
                        .map_err(|e| ResourceIndexError::xml(e.to_string()))?;
                    fields.insert(name.clone(), text.into_owned());
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == record {
                    if let Some(fields) = current.take() {
                        records.push(fields);
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ResourceIndexError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(records)
}

/// Little-endian reader over a byte slice.
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ResourceIndexError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(ResourceIndexError::Truncated(self.data.len()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn read_i32(&mut self) -> Result<i32, ResourceIndexError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_len(&mut self) -> Result<usize, ResourceIndexError> {
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| ResourceIndexError::NegativeLength(value))
    }

    /// Length-prefixed string; the length is a 7-bit varint.
    fn read_string(&mut self) -> Result<&'a str, ResourceIndexError> {
        let mut len = 0usize;
        let mut shift = 0;
        loop {
            let byte = self.take(1)?[0];
            len |= ((byte & 0x7f) as usize) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift > 28 {
                return Err(ResourceIndexError::Truncated(self.pos));
            }
        }
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes).map_err(|_| ResourceIndexError::InvalidUtf8)
    }
}
