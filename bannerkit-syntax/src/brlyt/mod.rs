//! BRLYT layout decoder: canvas size, textures/fonts name tables, materials,
//! groups, and the pane forest built from the `pas1`/`pae1` parent stack.

pub mod material;
pub mod pane;

use crate::byte_reader::ByteReader;
use crate::error::BannerError;
use crate::diagnostics::Logger;
use material::{
    AlphaCompare, BlendMode, Material, TEX_COORD_GEN_ENTRY_SIZE, TevStage, TextureMap, TextureSrt,
};
use pane::{Corner, Origin, Pane, PaneHeader, PicData, Transform, TxtData};

const BANNER_DEFAULT_SIZE: (f32, f32) = (608.0, 456.0);
const ICON_DEFAULT_SIZE: (f32, f32) = (128.0, 128.0);

/// A named group of panes. By convention, names of the form `RSO<N>` enumerate
/// mutually exclusive render states; the scene engine interprets that convention,
/// not this decoder.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub pane_names: Vec<String>,
}

/// A fully-decoded BRLYT layout.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub textures: Vec<String>,
    pub fonts: Vec<String>,
    pub materials: Vec<Material>,
    pub groups: Vec<Group>,
    /// Panes in declaration order; each header's `parent` is a resolved index
    /// into this same vector (or `None` for a pane declared at the root of the
    /// `pas1`/`pae1` stack).
    pub panes: Vec<Pane>,
}

/// Whether the caller expects a banner-sized or icon-sized layout, used only to
/// pick the fallback canvas size when `lyt1` is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCanvas {
    Banner,
    Icon,
}

pub fn decode_brlyt(
    data: &[u8],
    default_canvas: DefaultCanvas,
    logger: &dyn Logger,
) -> Result<Layout, BannerError> {
    let mut reader = ByteReader::new(data);
    reader.forward_tag(b"RLYT")?;
    reader.skip(2)?; // BOM
    reader.skip(2)?; // version
    let _file_size = reader.u32()?;
    let _header_size = reader.u16()?;
    let _section_count = reader.u16()?;

    let (default_w, default_h) = match default_canvas {
        DefaultCanvas::Banner => BANNER_DEFAULT_SIZE,
        DefaultCanvas::Icon => ICON_DEFAULT_SIZE,
    };

    let mut layout = Layout {
        width: default_w,
        height: default_h,
        textures: Vec::new(),
        fonts: Vec::new(),
        materials: Vec::new(),
        groups: Vec::new(),
        panes: Vec::new(),
    };

    // (pane_index_in_layout, is_open) stack driven by pas1/pae1; `None` at the
    // bottom means "root".
    let mut parent_stack: Vec<Option<usize>> = vec![None];

    while !reader.at_end() {
        let section_start = reader.offset();
        let Ok(tag) = reader.slice(4) else { break };
        let tag = tag.to_vec();
        let Ok(size) = reader.u32() else { break };
        if size < 8 {
            logger.error("BRLYT section with size < 8, aborting section walk");
            break;
        }
        let body_end = section_start + size as usize;
        let body = match data.get(reader.offset()..body_end) {
            Some(b) => b,
            None => {
                logger.error("BRLYT section runs past end of file, aborting section walk");
                break;
            }
        };

        match &tag[..] {
            b"lyt1" => {
                if let Ok((w, h)) = parse_lyt1(body) {
                    layout.width = w;
                    layout.height = h;
                }
            }
            b"txl1" => layout.textures = parse_name_table(body).unwrap_or_default(),
            b"fnl1" => layout.fonts = parse_name_table(body).unwrap_or_default(),
            b"mat1" => match parse_mat1(body) {
                Ok(materials) => layout.materials = materials,
                Err(e) => logger.error(&format!("mat1 section: {e}")),
            },
            b"grp1" => match parse_grp1(body) {
                Ok(group) => layout.groups.push(group),
                Err(e) => logger.error(&format!("grp1 section: {e}")),
            },
            b"pan1" | b"pic1" | b"txt1" | b"bnd1" | b"wnd1" => {
                let current_parent = *parent_stack.last().unwrap_or(&None);
                match parse_pane(&tag, body, current_parent, logger) {
                    Ok(pane) => layout.panes.push(pane),
                    Err(e) => logger.error(&format!("pane section: {e}")),
                }
            }
            b"pas1" => {
                let top = layout.panes.len().checked_sub(1);
                parent_stack.push(top);
            }
            b"pae1" => {
                parent_stack.pop();
            }
            other => {
                logger.warn(&format!(
                    "unrecognized BRLYT section {:?}, skipping",
                    String::from_utf8_lossy(other)
                ));
            }
        }

        reader.seek(body_end)?;
    }

    Ok(layout)
}

fn parse_lyt1(body: &[u8]) -> Result<(f32, f32), BannerError> {
    let mut r = ByteReader::new(body);
    r.skip(4)?; // draw flag + padding
    let w = r.f32()?;
    let h = r.f32()?;
    Ok((w, h))
}

fn parse_name_table(body: &[u8]) -> Result<Vec<String>, BannerError> {
    let mut r = ByteReader::new(body);
    let count = r.u32()?;
    let mut names = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let offset = r.u32()?;
        names.push(ByteReader::new(body).null_string_at(offset as usize)?);
    }
    Ok(names)
}

fn fixed_name(r: &mut ByteReader, len: usize) -> Result<String, BannerError> {
    r.string(len)
}

fn parse_mat1(body: &[u8]) -> Result<Vec<Material>, BannerError> {
    let mut r = ByteReader::new(body);
    let count = r.u32()?;
    let mut offsets = Vec::with_capacity(count as usize);
    for _ in 0..count {
        offsets.push(r.u32()?);
    }

    let mut materials = Vec::with_capacity(count as usize);
    for offset in offsets {
        let mut mr = ByteReader::new_with(body, offset as usize);
        let name = fixed_name(&mut mr, 20)?;

        let mut read_i16_quad = |r: &mut ByteReader| -> Result<[i16; 4], BannerError> {
            Ok([r.i16()?, r.i16()?, r.i16()?, r.i16()?])
        };
        let color1 = read_i16_quad(&mut mr)?;
        let color2 = read_i16_quad(&mut mr)?;
        let color3 = read_i16_quad(&mut mr)?;

        let flags = mr.u32()?;
        let (tex_map_count, tex_srt_count, tex_coord_gen_count) =
            Material::counts_from_flags(flags);

        let mut texture_maps = Vec::with_capacity(tex_map_count as usize);
        for _ in 0..tex_map_count {
            let texture_index = mr.u16()?;
            let wrap_s = mr.u8()?;
            let wrap_t = mr.u8()?;
            texture_maps.push(TextureMap {
                texture_index,
                wrap_s,
                wrap_t,
            });
        }

        let mut texture_srts = Vec::with_capacity(tex_srt_count as usize);
        for _ in 0..tex_srt_count {
            texture_srts.push(TextureSrt {
                x_translate: mr.f32()?,
                y_translate: mr.f32()?,
                rotation: mr.f32()?,
                x_scale: mr.f32()?,
                y_scale: mr.f32()?,
            });
        }

        // texCoordGen entries are tracked only as a count (§54); skip past
        // them so tevColors and the blocks after it line up correctly.
        mr.skip(tex_coord_gen_count as usize * TEX_COORD_GEN_ENTRY_SIZE)?;

        let mut tev_colors = [[0u8; 4]; 4];
        for c in tev_colors.iter_mut() {
            if let Ok(bytes) = mr.slice(4) {
                c.copy_from_slice(bytes);
            }
        }

        let (tev_stage_count, has_alpha_compare, has_blend_mode) =
            Material::opt_flags_from_flags(flags);

        let mut tev_stages = Vec::with_capacity(tev_stage_count as usize);
        for _ in 0..tev_stage_count {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(mr.slice(8)?);
            tev_stages.push(TevStage { raw });
        }

        let alpha_compare = if has_alpha_compare {
            AlphaCompare {
                comp0: mr.u8()?,
                comp1: mr.u8()?,
                operation: mr.u8()?,
                ref0: mr.u8()?,
                ref1: mr.u8()?,
            }
        } else {
            AlphaCompare::default()
        };

        let blend_mode = if has_blend_mode {
            BlendMode {
                blend_type: mr.u8()?,
                src_factor: mr.u8()?,
                dst_factor: mr.u8()?,
                logic_op: mr.u8()?,
            }
        } else {
            BlendMode::default()
        };

        materials.push(Material {
            name,
            flags,
            texture_maps,
            texture_srts,
            tex_coord_gen_count,
            color1,
            color2,
            color3,
            tev_colors,
            tev_stages,
            blend_mode,
            alpha_compare,
        });
    }

    Ok(materials)
}

fn parse_grp1(body: &[u8]) -> Result<Group, BannerError> {
    let mut r = ByteReader::new(body);
    let name = fixed_name(&mut r, 20)?;
    let num_panes = r.u16()?;
    r.skip(2)?; // padding

    let mut pane_names = Vec::with_capacity(num_panes as usize);
    for _ in 0..num_panes {
        pane_names.push(fixed_name(&mut r, 16)?);
    }

    Ok(Group { name, pane_names })
}

fn parse_pane_header(r: &mut ByteReader, parent: Option<usize>) -> Result<PaneHeader, BannerError> {
    let flags = r.u8()?;
    let origin_raw = r.u8()?;
    let alpha = r.u8()?;
    r.skip(1)?; // padding
    let name = fixed_name(r, 20)?;
    r.skip(4)?; // reserved/user-data offset, not modeled

    let translate = [r.f32()?, r.f32()?, r.f32()?];
    let rotate = [r.f32()?, r.f32()?, r.f32()?];
    let scale = [r.f32()?, r.f32()?];
    let size = [r.f32()?, r.f32()?];

    Ok(PaneHeader {
        name,
        visible: flags & 0x01 != 0,
        origin: Origin::from_raw(origin_raw),
        alpha,
        parent,
        transform: Transform {
            translate,
            rotate,
            scale,
            size,
        },
    })
}

fn parse_pane(
    tag: &[u8],
    body: &[u8],
    parent: Option<usize>,
    logger: &dyn Logger,
) -> Result<Pane, BannerError> {
    let mut r = ByteReader::new(body);
    let header = parse_pane_header(&mut r, parent)?;

    match tag {
        b"pan1" => Ok(Pane::Pan(header)),
        b"bnd1" => Ok(Pane::Bnd(header)),
        b"wnd1" => Ok(Pane::Wnd(header)),
        b"pic1" => {
            let mut vertex_colors = [[0u8; 4]; 4];
            for c in vertex_colors.iter_mut() {
                let bytes = r.slice(4)?;
                c.copy_from_slice(bytes);
            }
            let material_index = r.i16()?;
            let num_tex_coord_sets = r.u8()?;
            r.skip(1)?; // padding

            let mut tex_coords = Vec::with_capacity(num_tex_coord_sets as usize);
            for _ in 0..num_tex_coord_sets {
                let mut quad = [pane::TexCoord::default(); 4];
                for (i, corner) in [
                    Corner::TopLeft,
                    Corner::TopRight,
                    Corner::BottomLeft,
                    Corner::BottomRight,
                ]
                .into_iter()
                .enumerate()
                {
                    let _ = corner;
                    quad[i] = pane::TexCoord {
                        s: r.f32()?,
                        t: r.f32()?,
                    };
                }
                tex_coords.push(quad);
            }

            Ok(Pane::Pic(
                header,
                PicData {
                    vertex_colors,
                    material_index,
                    tex_coords,
                },
            ))
        }
        b"txt1" => {
            let text_buffer_bytes = r.u16()?;
            let text_length_bytes = r.u16()?;
            let material_index = r.i16()?;
            let font_index = r.i16()?;
            let position_flags = r.u8()?;
            let alignment = r.u8()?;
            r.skip(2)?; // padding
            let top_color_bytes = r.slice(4)?;
            let mut top_color = [0u8; 4];
            top_color.copy_from_slice(top_color_bytes);
            let bottom_color_bytes = r.slice(4)?;
            let mut bottom_color = [0u8; 4];
            bottom_color.copy_from_slice(bottom_color_bytes);
            let font_size = [r.f32()?, r.f32()?];
            let char_spacing = r.f32()?;
            let line_spacing = r.f32()?;

            let text = decode_text_buffer(&mut r, text_buffer_bytes, text_length_bytes, logger);

            Ok(Pane::Txt(
                header,
                TxtData {
                    text_buffer_bytes,
                    material_index,
                    font_index,
                    position_flags,
                    alignment,
                    top_color,
                    bottom_color,
                    font_size,
                    char_spacing,
                    line_spacing,
                    text,
                },
            ))
        }
        _ => unreachable!("dispatched only for known pane tags"),
    }
}

/// Decode the UTF-16BE text payload following a `txt1` trailer. Malformed or
/// zero-sized payloads resolve to empty text rather than failing the whole pane.
fn decode_text_buffer(
    r: &mut ByteReader,
    buffer_bytes: u16,
    length_bytes: u16,
    logger: &dyn Logger,
) -> String {
    let Ok(bytes) = r.slice(buffer_bytes as usize) else {
        logger.warn("txt1 text buffer truncated, using empty text");
        return String::new();
    };

    let used = (length_bytes as usize).min(bytes.len());
    let used = used - (used % 2);

    let units: Vec<u16> = bytes[..used]
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .take_while(|&u| u != 0)
        .collect();

    String::from_utf16_lossy(&units)
}
