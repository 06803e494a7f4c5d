//! BRFNT bitmap-font decoder: `FINF`/`TGLP`/`CWDH`/`CMAP` sections describing a
//! glyph sheet (decoded with the same block detilers as a standalone TPL image)
//! plus the width and code-point tables needed to lay out text.

use crate::byte_reader::ByteReader;
use crate::diagnostics::Logger;
use crate::error::BannerError;
use crate::tpl::{Ci14x2Reading, TplImage, decode_block_format};
use rustc_hash::FxHashMap;

/// Per-glyph width metrics: signed left bearing, the glyph's own pixel width,
/// and the full advance width (bearing + glyph + right bearing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharWidth {
    pub left: i8,
    pub glyph_width: u8,
    pub char_width: u8,
}

/// `FINF` section fields.
#[derive(Debug, Clone)]
pub struct FontInfo {
    pub font_type: u8,
    pub line_feed: u8,
    /// Glyph index substituted for any code point with no `CMAP` entry.
    pub default_char: u16,
    pub default_width: CharWidth,
    pub encoding: u8,
    pub height: u8,
    pub width: u8,
    pub ascent: u8,
}

/// `TGLP` section fields describing how glyph sheets are laid out.
#[derive(Debug, Clone)]
pub struct GlyphInfo {
    pub cell_width: u8,
    pub cell_height: u8,
    pub baseline_pos: u8,
    pub max_char_width: u8,
    pub sheet_format: u32,
    pub sheet_row: u16,
    pub sheet_line: u16,
    pub sheet_width: u16,
    pub sheet_height: u16,
    pub num_sheets: u16,
}

/// A fully-decoded bitmap font.
#[derive(Debug, Clone)]
pub struct Font {
    pub info: FontInfo,
    pub glyph_info: GlyphInfo,
    pub char_widths: FxHashMap<u16, CharWidth>,
    pub char_map: FxHashMap<u32, u16>,
    pub sheets: Vec<TplImage>,
}

impl Font {
    /// Resolve a Unicode code point to a glyph index, falling back to
    /// [`FontInfo::default_char`] when no `CMAP` entry covers it.
    pub fn glyph_for(&self, codepoint: u32) -> u16 {
        self.char_map
            .get(&codepoint)
            .copied()
            .unwrap_or(self.info.default_char)
    }
}

pub fn decode_brfnt(data: &[u8], logger: &dyn Logger) -> Result<Font, BannerError> {
    let mut reader = ByteReader::new(data);
    reader.forward_tag(b"RFNT")?;
    reader.skip(2)?; // BOM
    reader.skip(2)?; // version
    let _file_size = reader.u32()?;
    let _header_size = reader.u16()?;
    let _section_count = reader.u16()?;

    let mut info: Option<FontInfo> = None;
    let mut glyph_info: Option<GlyphInfo> = None;
    let mut sheets = Vec::new();
    let mut char_widths = FxHashMap::default();
    let mut char_map = FxHashMap::default();

    while !reader.at_end() {
        let section_start = reader.offset();
        let Ok(tag) = reader.slice(4) else { break };
        let tag = tag.to_vec();
        let Ok(size) = reader.u32() else { break };
        if size < 8 {
            logger.error("BRFNT section with size < 8, aborting section walk");
            break;
        }
        let body_end = section_start + size as usize;
        let body_offset = reader.offset();
        let body = match data.get(body_offset..body_end) {
            Some(b) => b,
            None => {
                logger.error("BRFNT section runs past end of file, aborting section walk");
                break;
            }
        };

        match &tag[..] {
            b"FINF" => match parse_finf(body) {
                Ok(f) => info = Some(f),
                Err(e) => logger.error(&format!("FINF section: {e}")),
            },
            b"TGLP" => match parse_tglp(data, body, logger) {
                Ok((gi, sheet_images)) => {
                    glyph_info = Some(gi);
                    sheets = sheet_images;
                }
                Err(e) => logger.error(&format!("TGLP section: {e}")),
            },
            b"CWDH" => match parse_cwdh_chain(data, body_offset) {
                Ok(widths) => char_widths.extend(widths),
                Err(e) => logger.error(&format!("CWDH section: {e}")),
            },
            b"CMAP" => match parse_cmap_chain(data, body_offset, logger) {
                Ok(map) => char_map.extend(map),
                Err(e) => logger.error(&format!("CMAP section: {e}")),
            },
            other => {
                logger.warn(&format!(
                    "unrecognized BRFNT section {:?}, skipping",
                    String::from_utf8_lossy(other)
                ));
            }
        }

        reader.seek(body_end)?;
    }

    let info = info.ok_or_else(|| BannerError::bad_magic("BRFNT missing FINF section"))?;
    let glyph_info =
        glyph_info.ok_or_else(|| BannerError::bad_magic("BRFNT missing TGLP section"))?;

    Ok(Font {
        info,
        glyph_info,
        char_widths,
        char_map,
        sheets,
    })
}

fn parse_finf(body: &[u8]) -> Result<FontInfo, BannerError> {
    let mut r = ByteReader::new(body);
    let font_type = r.u8()?;
    let line_feed = r.u8()?;
    let default_char = r.u16()?;
    let left = r.u8()? as i8;
    let glyph_width = r.u8()?;
    let char_width = r.u8()?;
    let encoding = r.u8()?;
    r.skip(8)?; // TGLP/CWDH/CMAP offsets, not needed: sections are found by tag walk.
    let height = r.u8()?;
    let width = r.u8()?;
    let ascent = r.u8()?;

    Ok(FontInfo {
        font_type,
        line_feed,
        default_char,
        default_width: CharWidth {
            left,
            glyph_width,
            char_width,
        },
        encoding,
        height,
        width,
        ascent,
    })
}

fn parse_tglp(
    file: &[u8],
    body: &[u8],
    logger: &dyn Logger,
) -> Result<(GlyphInfo, Vec<TplImage>), BannerError> {
    let mut r = ByteReader::new(body);
    let cell_width = r.u8()?;
    let cell_height = r.u8()?;
    let baseline_pos = r.u8()?;
    let max_char_width = r.u8()?;
    let sheet_size = r.u32()?;
    let num_sheets = r.u16()?;
    let sheet_format = r.u16()? as u32;
    let sheet_row = r.u16()?;
    let sheet_line = r.u16()?;
    let sheet_width = r.u16()?;
    let sheet_height = r.u16()?;
    let sheet_image_offset = r.u32()?;

    let mut sheets = Vec::with_capacity(num_sheets as usize);
    for i in 0..num_sheets {
        let offset = sheet_image_offset as usize + i as usize * sheet_size as usize;
        let pixels = decode_block_format(
            sheet_format,
            file,
            offset,
            sheet_width as usize,
            sheet_height as usize,
            None,
            Ci14x2Reading::default(),
        );
        let Some(pixels) = pixels else {
            logger.warn(&format!(
                "unsupported BRFNT glyph sheet format {sheet_format}, skipping sheet {i}"
            ));
            continue;
        };
        sheets.push(TplImage {
            width: sheet_width,
            height: sheet_height,
            format: sheet_format,
            pixels,
        });
    }

    Ok((
        GlyphInfo {
            cell_width,
            cell_height,
            baseline_pos,
            max_char_width,
            sheet_format,
            sheet_row,
            sheet_line,
            sheet_width,
            sheet_height,
            num_sheets,
        },
        sheets,
    ))
}

/// `CWDH` sections form a singly-linked chain via `nextOffset`, each covering a
/// contiguous `[firstChar, lastChar]` glyph-index range.
fn parse_cwdh_chain(
    file: &[u8],
    first_offset: usize,
) -> Result<FxHashMap<u16, CharWidth>, BannerError> {
    let mut out = FxHashMap::default();
    let mut cursor = Some(first_offset);

    while let Some(offset) = cursor {
        let mut r = ByteReader::new_with(file, offset);
        let first_char = r.u16()?;
        let last_char = r.u16()?;
        let next_offset = r.u32()?;

        let count = (last_char as u32 + 1).saturating_sub(first_char as u32);
        for i in 0..count {
            let left = r.u8()? as i8;
            let glyph_width = r.u8()?;
            let char_width = r.u8()?;
            out.insert(
                first_char + i as u16,
                CharWidth {
                    left,
                    glyph_width,
                    char_width,
                },
            );
        }

        cursor = (next_offset != 0).then_some(next_offset as usize);
    }

    Ok(out)
}

/// `CMAP` sections also chain via `nextOffset`, each using one of three mapping
/// methods: `0` direct (contiguous glyph indices), `1` table (one u16 per code
/// point, `0xFFFF` = unmapped), `2` scan (an explicit sorted `(code, glyph)`
/// pair list).
fn parse_cmap_chain(
    file: &[u8],
    first_offset: usize,
    logger: &dyn Logger,
) -> Result<FxHashMap<u32, u16>, BannerError> {
    let mut out = FxHashMap::default();
    let mut cursor = Some(first_offset);

    while let Some(offset) = cursor {
        let mut r = ByteReader::new_with(file, offset);
        let first_char = r.u16()?;
        let last_char = r.u16()?;
        let mapping_method = r.u16()?;
        r.skip(2)?; // padding
        let next_offset = r.u32()?;

        match mapping_method {
            0 => {
                let first_glyph_index = r.u16()?;
                let count = (last_char as u32 + 1).saturating_sub(first_char as u32);
                for i in 0..count {
                    out.insert(first_char as u32 + i, first_glyph_index + i as u16);
                }
            }
            1 => {
                let count = (last_char as u32 + 1).saturating_sub(first_char as u32);
                for i in 0..count {
                    let glyph = r.u16()?;
                    if glyph != 0xFFFF {
                        out.insert(first_char as u32 + i, glyph);
                    }
                }
            }
            2 => {
                let count = r.u16()?;
                r.skip(2)?; // padding
                for _ in 0..count {
                    let code = r.u16()?;
                    let glyph = r.u16()?;
                    out.insert(code as u32, glyph);
                }
            }
            other => {
                logger.warn(&format!("unsupported BRFNT CMAP mapping method {other}"));
            }
        }

        cursor = (next_offset != 0).then_some(next_offset as usize);
    }

    Ok(out)
}
