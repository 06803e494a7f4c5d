//! WAD container framing: header, ticket, TMD content-record table, and the
//! 64-byte-aligned section layout that ties them together.

use crate::byte_reader::ByteReader;
use crate::crypto;
use crate::error::BannerError;
use crate::diagnostics::Logger;
use rustc_hash::FxHashMap;

fn align64(offset: u32) -> u32 {
    (offset + 63) & !63
}

/// One content record from the TMD's content table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    /// The content's ID, used to derive its on-disk filename.
    pub id: u32,
    /// Index into the WAD's content array; also the low bytes of the decrypt IV.
    pub index: u16,
    /// TMD content type bitfield (normal/shared/dlc).
    pub content_type: u16,
    /// Exact plaintext size in bytes.
    pub plaintext_size: u64,
    /// Ciphertext size: `plaintext_size` rounded up to a 16-byte boundary.
    pub encrypted_size: u64,
    /// Byte offset of this content's ciphertext within the WAD's data section.
    pub offset: u64,
}

impl ContentRecord {
    /// The content's canonical on-disk filename, `"%08x.app"`.
    pub fn filename(&self) -> String {
        format!("{:08x}.app", self.id)
    }
}

/// Ticket fields relevant to title-key decryption.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// 8-byte title ID, used as the AES-CBC IV when unwrapping the title key.
    pub title_id_bytes: [u8; 8],
    /// The still-encrypted title key.
    pub encrypted_title_key: [u8; 16],
    /// Selects one of the three platform-wide common keys.
    pub common_key_index: u8,
}

impl Ticket {
    const ENCRYPTED_TITLE_KEY_OFFSET: usize = 0x1BF;
    const TITLE_ID_OFFSET: usize = 0x1DC;
    const COMMON_KEY_INDEX_OFFSET: usize = 0x1F5;

    fn parse(data: &[u8]) -> Result<Self, BannerError> {
        let mut reader = ByteReader::new(data);

        reader.seek(Self::ENCRYPTED_TITLE_KEY_OFFSET)?;
        let key_bytes = reader.slice(16)?;
        let mut encrypted_title_key = [0u8; 16];
        encrypted_title_key.copy_from_slice(key_bytes);

        reader.seek(Self::TITLE_ID_OFFSET)?;
        let id_bytes = reader.slice(8)?;
        let mut title_id_bytes = [0u8; 8];
        title_id_bytes.copy_from_slice(id_bytes);

        reader.seek(Self::COMMON_KEY_INDEX_OFFSET)?;
        let common_key_index = reader.u8()?;

        Ok(Self {
            title_id_bytes,
            encrypted_title_key,
            common_key_index,
        })
    }
}

/// TMD content-record table plus the fields needed to locate the data section.
#[derive(Debug, Clone)]
struct Tmd {
    contents: Vec<ContentRecord>,
}

impl Tmd {
    const NUM_CONTENTS_OFFSET: usize = 0x1DE;
    const CONTENT_TABLE_OFFSET: usize = 0x1E4;
    const RECORD_SIZE: usize = 36;

    fn parse(data: &[u8], data_section_offset: u64) -> Result<Self, BannerError> {
        let mut reader = ByteReader::new(data);
        reader.seek(Self::NUM_CONTENTS_OFFSET)?;
        let num_contents = reader.u16()? as usize;

        reader.seek(Self::CONTENT_TABLE_OFFSET)?;

        let mut contents = Vec::with_capacity(num_contents);
        let mut running_offset = data_section_offset;

        for _ in 0..num_contents {
            let start = reader.offset();
            if start + Self::RECORD_SIZE > data.len() {
                return Err(BannerError::truncated("TMD content record table"));
            }

            let id = reader.u32()?;
            let index = reader.u16()?;
            let content_type = reader.u16()?;
            let size_hi = reader.u32()?;
            let size_lo = reader.u32()?;
            let plaintext_size = ((size_hi as u64) << 32) | size_lo as u64;
            reader.skip(20)?; // hash

            let encrypted_size = plaintext_size.div_ceil(16) * 16;

            contents.push(ContentRecord {
                id,
                index,
                content_type,
                plaintext_size,
                encrypted_size,
                offset: running_offset,
            });

            running_offset += encrypted_size;
        }

        Ok(Self { contents })
    }
}

/// A fully-framed WAD: header fields, parsed ticket, content records, and a map
/// from each content's canonical filename to its still-encrypted byte slice.
#[derive(Debug, Clone)]
pub struct WadFrame {
    /// Four-byte WAD type field from the header (e.g. `"Is\0\0"`).
    pub wad_type: u32,
    /// Parsed ticket.
    pub ticket: Ticket,
    /// Content records in TMD declaration order.
    pub contents: Vec<ContentRecord>,
}

impl WadFrame {
    const HEADER_LEN: usize = 32;

    /// Parse a complete WAD image, returning its framing metadata.
    ///
    /// This is the one entry point in the crate allowed to abort outright: a
    /// malformed top-level header means there is no usable structure at all.
    pub fn parse(data: &[u8]) -> Result<(Self, FxHashMap<String, Vec<u8>>), BannerError> {
        let mut reader = ByteReader::new(data);

        let header_size = reader.u32()?;
        let wad_type = reader.u32()?;
        let cert_chain_len = reader.u32()?;
        let _pad = reader.u32()?;
        let ticket_len = reader.u32()?;
        let tmd_len = reader.u32()?;
        let data_len = reader.u32()?;
        let _footer_len = reader.u32()?;

        if header_size as usize != Self::HEADER_LEN {
            return Err(BannerError::bad_magic(format!(
                "unexpected WAD header size {header_size}"
            )));
        }

        let header_end = align64(header_size);
        let cert_chain_end = align64(header_end + cert_chain_len);
        let ticket_end = align64(cert_chain_end + ticket_len);
        let tmd_end = align64(ticket_end + tmd_len);
        let data_end = align64(tmd_end + data_len);
        let _ = data_end;

        let ticket_bytes = data
            .get(cert_chain_end as usize..(cert_chain_end + ticket_len) as usize)
            .ok_or_else(|| BannerError::truncated("ticket section"))?;
        let ticket = Ticket::parse(ticket_bytes)?;

        let tmd_bytes = data
            .get(ticket_end as usize..(ticket_end + tmd_len) as usize)
            .ok_or_else(|| BannerError::truncated("TMD section"))?;
        let tmd = Tmd::parse(tmd_bytes, tmd_end as u64)?;

        let mut contents_by_name = FxHashMap::default();
        for record in &tmd.contents {
            let start = record.offset as usize;
            let end = start + record.encrypted_size as usize;
            let slice = data
                .get(start..end)
                .ok_or_else(|| BannerError::truncated(format!("content {}", record.filename())))?;
            contents_by_name.insert(record.filename(), slice.to_vec());
        }

        Ok((
            Self {
                wad_type,
                ticket,
                contents: tmd.contents,
            },
            contents_by_name,
        ))
    }

    /// Decrypt a single content by its record, logging and returning `None` on any
    /// recoverable failure (wrong common key, unaligned ciphertext, etc).
    pub fn decrypt_content(
        &self,
        record: &ContentRecord,
        ciphertext: &[u8],
        logger: &dyn Logger,
    ) -> Option<Vec<u8>> {
        let title_key = crypto::decrypt_title_key(
            &self.ticket.encrypted_title_key,
            &self.ticket.title_id_bytes,
            self.ticket.common_key_index,
        )
        .map_err(|e| logger.warn(&format!("title key unwrap failed: {e}")))
        .ok()?;

        let plain = crypto::decrypt_content(&title_key, record.index, ciphertext)
            .map_err(|e| logger.warn(&format!("content decrypt failed: {e}")))
            .ok()?;

        let size = record.plaintext_size as usize;
        if size > plain.len() {
            logger.warn(&format!(
                "content {} declares {size} plaintext bytes but only {} decrypted",
                record.filename(),
                plain.len()
            ));
            return None;
        }

        Some(plain[..size].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_minimal_wad() -> Vec<u8> {
        let mut out = Vec::new();
        // header
        out.extend_from_slice(&32u32.to_be_bytes()); // headerSize
        out.extend_from_slice(&0x4973_0000u32.to_be_bytes()); // type "Is\0\0"-ish
        out.extend_from_slice(&0u32.to_be_bytes()); // certChainLen
        out.extend_from_slice(&0u32.to_be_bytes()); // pad
        let ticket_len = 0x2A4u32;
        out.extend_from_slice(&ticket_len.to_be_bytes());
        let tmd_len = 0x1E4u32 + 36; // header + 1 content record
        out.extend_from_slice(&tmd_len.to_be_bytes());
        out.extend_from_slice(&36u32.to_be_bytes()); // dataLen: one 36-byte? not aligned but fine for this test
        out.extend_from_slice(&0u32.to_be_bytes()); // footerLen
        while out.len() < 64 {
            out.push(0);
        }

        // ticket at offset 64 (align64(32)=64, certChainEnd=64)
        let ticket_start = out.len();
        let mut ticket = vec![0u8; ticket_len as usize];
        ticket[0x1DC..0x1E4].copy_from_slice(b"00010002");
        ticket[0x1F5] = 0;
        out.extend_from_slice(&ticket);
        while (out.len() - ticket_start) % 64 != 0 {
            out.push(0);
        }

        // tmd
        let tmd_start = out.len();
        let mut tmd = vec![0u8; (tmd_len) as usize];
        tmd[0x1DE..0x1E0].copy_from_slice(&1u16.to_be_bytes());
        let rec_off = 0x1E4;
        tmd[rec_off..rec_off + 4].copy_from_slice(&1u32.to_be_bytes()); // id
        tmd[rec_off + 4..rec_off + 6].copy_from_slice(&0u16.to_be_bytes()); // index
        tmd[rec_off + 6..rec_off + 8].copy_from_slice(&0u16.to_be_bytes()); // type
        tmd[rec_off + 8..rec_off + 12].copy_from_slice(&0u32.to_be_bytes()); // size hi
        tmd[rec_off + 12..rec_off + 16].copy_from_slice(&16u32.to_be_bytes()); // size lo = 16
        out.extend_from_slice(&tmd);
        let _ = tmd_start;
        while out.len() % 64 != 0 {
            out.push(0);
        }

        // data: 16 bytes of content
        out.extend_from_slice(&[0xAAu8; 16]);

        out
    }

    #[test]
    fn parses_header_ticket_and_tmd() {
        let data = build_minimal_wad();
        let (frame, contents) = WadFrame::parse(&data).unwrap();
        assert_eq!(frame.contents.len(), 1);
        assert_eq!(frame.contents[0].id, 1);
        assert_eq!(frame.contents[0].plaintext_size, 16);
        assert_eq!(frame.ticket.title_id_bytes, *b"00010002");
        assert!(contents.contains_key("00000001.app"));
    }

    #[test]
    fn rejects_bad_header_size() {
        let mut data = build_minimal_wad();
        data[0..4].copy_from_slice(&99u32.to_be_bytes());
        assert!(WadFrame::parse(&data).is_err());
    }
}
