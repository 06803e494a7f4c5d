//! U8 archive: Nintendo's packaged-asset container. Transparently unwraps IMD5,
//! LZ77, and Yaz0 framing before falling back to a magic scan.

use crate::byte_reader::ByteReader;
use crate::compression::{SizeOrder, decode_lz77, decode_yaz0};
use crate::error::BannerError;
use crate::diagnostics::Logger;
use rustc_hash::FxHashMap;

const U8_MAGIC: u32 = 0x55AA_382D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    File,
    Directory,
}

struct RawNode {
    kind: NodeKind,
    name_offset: u32,
    data_offset: u32,
    size_or_end_index: u32,
}

/// A decoded U8 archive: a flat map from slash-delimited path to file contents.
#[derive(Debug, Clone, Default)]
pub struct U8Archive {
    files: FxHashMap<String, Vec<u8>>,
}

impl U8Archive {
    /// Look up a file by its slash-delimited path.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Iterate all paths in this archive, in node-table declaration order is not
    /// preserved by this map; callers needing declaration order should not rely on
    /// iteration order here.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    /// Number of files in this archive.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether this archive contains no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Parse a U8 archive, transparently unwrapping IMD5/LZ77/Yaz0 framing and
    /// falling back to a magic scan if the buffer doesn't start with a recognized
    /// header. Returns `NoRenderable`-adjacent failures as `BadMagic`/`MalformedStream`
    /// so the caller (pipeline orchestrator) can decide how to treat the content.
    pub fn parse(data: &[u8], logger: &dyn Logger) -> Result<Self, BannerError> {
        if data.len() >= 4 && u32::from_be_bytes([data[0], data[1], data[2], data[3]]) == U8_MAGIC
        {
            return Self::parse_raw(data);
        }

        if data.len() >= 32 && &data[0..4] == b"\0IMD" && data[4] == b'5' {
            logger.info("U8 archive wrapped in IMD5, stripping header");
            return Self::parse_raw(&data[32..]);
        }
        // Some IMD5 variants use the literal tag "IMD5" at offset 0.
        if data.len() >= 32 && &data[0..4] == b"IMD5" {
            logger.info("U8 archive wrapped in IMD5, stripping header");
            return Self::parse_raw(&data[32..]);
        }

        if data.len() >= 8 && &data[0..4] == b"LZ77" {
            logger.info("U8 archive wrapped in LZ77, decoding");
            let be = decode_lz77(data, SizeOrder::Be).ok();
            let le = decode_lz77(data, SizeOrder::Le).ok();
            if let Some(best) = pick_best_lz_candidate(be, le) {
                return Self::parse_raw(&best);
            }
            return Err(BannerError::malformed_stream("LZ77 wrapper decode failed"));
        }

        if data.len() >= 16 && &data[0..4] == b"Yaz0" {
            logger.info("U8 archive wrapped in Yaz0, decoding");
            let decoded = decode_yaz0(data)?;
            return Self::parse_raw(&decoded);
        }

        logger.warn("U8 magic not found at offset 0, scanning for embedded archive");
        Self::magic_scan(data)
    }

    fn parse_raw(data: &[u8]) -> Result<Self, BannerError> {
        let mut reader = ByteReader::new(data);
        if reader.u32()? != U8_MAGIC {
            return Err(BannerError::bad_magic("U8 root magic"));
        }

        let root_node_offset = reader.u32()?;
        let _nodes_size = reader.u32()?;
        let _data_offset = reader.u32()?;

        Self::parse_from_root(data, root_node_offset as usize)
    }

    fn parse_from_root(data: &[u8], root_node_offset: usize) -> Result<Self, BannerError> {
        // Peek the root node: its type must be directory, and its sizeOrEndIndex
        // field gives numEntries, the count of 12-byte node records that follow.
        let mut peek = ByteReader::new_with(data, root_node_offset);
        let root_type = peek.u8()?;
        if root_type != 1 {
            return Err(BannerError::bad_magic("U8 root node is not a directory"));
        }
        let _name_offset = peek.u24()?;
        let _data_offset = peek.u32()?;
        let num_entries = peek.u32()? as usize;

        if num_entries == 0 {
            return Err(BannerError::bad_magic("U8 root node has zero entries"));
        }

        let string_table_offset = root_node_offset + num_entries * 12;

        let mut nodes = Vec::with_capacity(num_entries);
        let mut reader = ByteReader::new_with(data, root_node_offset);
        for _ in 0..num_entries {
            let kind_byte = reader.u8()?;
            let kind = if kind_byte == 1 {
                NodeKind::Directory
            } else {
                NodeKind::File
            };
            let name_offset = reader.u24()?;
            let data_offset = reader.u32()?;
            let size_or_end_index = reader.u32()?;
            nodes.push(RawNode {
                kind,
                name_offset,
                data_offset,
                size_or_end_index,
            });
        }

        let mut files = FxHashMap::default();
        // Stack of (end_index, path_prefix) for the directories currently open.
        let mut dir_stack: Vec<(usize, String)> = vec![(num_entries, String::new())];

        let mut index = 1usize; // node 0 is the root directory itself.
        while index < num_entries {
            while let Some(&(end_index, _)) = dir_stack.last() {
                if index >= end_index {
                    dir_stack.pop();
                } else {
                    break;
                }
            }

            let prefix = dir_stack.last().map(|(_, p)| p.clone()).unwrap_or_default();
            let node = &nodes[index];
            let name = ByteReader::new(data)
                .null_string_at(string_table_offset + node.name_offset as usize)?;

            let path = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };

            match node.kind {
                NodeKind::Directory => {
                    dir_stack.push((node.size_or_end_index as usize, path));
                }
                NodeKind::File => {
                    let start = node.data_offset as usize;
                    let end = start + node.size_or_end_index as usize;
                    let bytes = data
                        .get(start..end)
                        .ok_or_else(|| BannerError::truncated(format!("U8 file {path}")))?;
                    files.insert(path, bytes.to_vec());
                }
            }

            index += 1;
        }

        Ok(Self { files })
    }

    /// Scan for an embedded U8 archive when no header is recognized at offset 0,
    /// applying the structural sanity checks from the container spec: the root
    /// node offset must be at least `0x10`, its type must be directory, and it
    /// must declare at least one entry.
    fn magic_scan(data: &[u8]) -> Result<Self, BannerError> {
        for pos in 0..data.len().saturating_sub(4) {
            if data[pos..pos + 4] != U8_MAGIC.to_be_bytes() {
                continue;
            }

            let candidate = &data[pos..];
            let mut reader = ByteReader::new(candidate);
            let Ok(_magic) = reader.u32() else { continue };
            let Ok(root_node_offset) = reader.u32() else {
                continue;
            };

            if root_node_offset < 0x10 {
                continue;
            }

            let mut peek = ByteReader::new_with(candidate, root_node_offset as usize);
            let Ok(root_type) = peek.u8() else { continue };
            if root_type != 1 {
                continue;
            }
            let Ok(_name_offset) = peek.u24() else {
                continue;
            };
            let Ok(_data_offset) = peek.u32() else {
                continue;
            };
            let Ok(num_entries) = peek.u32() else {
                continue;
            };
            if num_entries == 0 {
                continue;
            }

            if let Ok(archive) = Self::parse_raw(candidate) {
                return Ok(archive);
            }
        }

        Err(BannerError::bad_magic(
            "no embedded U8 archive found during magic scan",
        ))
    }
}

/// Score two candidate LZ77 decodes (BE- and LE-sized headers) and return the one
/// whose output parses as a more plausible U8 archive. Ties prefer the smaller
/// output, per the deterministic tie-break in the testable-properties list.
fn pick_best_lz_candidate(be: Option<Vec<u8>>, le: Option<Vec<u8>>) -> Option<Vec<u8>> {
    let score = |buf: &[u8]| -> usize {
        U8Archive::parse_raw(buf).map(|a| a.len()).unwrap_or(0)
    };

    match (be, le) {
        (Some(be), Some(le)) => {
            let be_score = score(&be);
            let le_score = score(&le);
            if be_score > le_score {
                Some(be)
            } else if le_score > be_score {
                Some(le)
            } else if be.len() <= le.len() {
                Some(be)
            } else {
                Some(le)
            }
        }
        (Some(be), None) => Some(be),
        (None, Some(le)) => Some(le),
        (None, None) => None,
    }
}
