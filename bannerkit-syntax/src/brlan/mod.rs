//! BRLAN animation decoder: a single `pai1` section holding, per pane, a set of
//! tagged keyframe tracks (translate/rotate/scale/size/alpha/visibility/texture
//! SRT/material color/texture-pattern index).

use crate::byte_reader::ByteReader;
use crate::diagnostics::Logger;
use crate::error::BannerError;

/// Which interpolation a track's keyframe records carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `(frame: f32, value: f32)`, linearly interpolated.
    Linear,
    /// `(frame: f32, value: u16, reserved: u16)`, floor-selected (no interpolation).
    Step,
    /// `(frame: f32, value: f32, blend: f32)`, cubic-Hermite interpolated.
    Hermite,
}

impl DataType {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(DataType::Linear),
            1 => Some(DataType::Step),
            2 => Some(DataType::Hermite),
            _ => None,
        }
    }
}

/// One sample of a keyframe track. `blend` is the Hermite tangent and is `0` for
/// linear and step tracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
    pub blend: f32,
}

/// The tag a track belongs to, narrowing which opcodes are legal for its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    /// Pane transform: translate/rotate/scale/size.
    Rlpa,
    /// Vertex-color alpha (opcode `0x10`).
    Rlvc,
    /// Visibility (dataType=1, opcode `0x00`).
    Rlvi,
    /// Texture SRT override on a material.
    Rlts,
    /// Material color register channel.
    Rlmc,
    /// Discrete texture-pattern index.
    Rltp,
    /// Any tag type this decoder doesn't special-case; the raw 4-byte tag is kept
    /// for diagnostics.
    Unknown([u8; 4]),
}

impl TagType {
    fn from_tag(tag: &[u8]) -> Self {
        match tag {
            b"RLPA" => TagType::Rlpa,
            b"RLVC" => TagType::Rlvc,
            b"RLVI" => TagType::Rlvi,
            b"RLTS" => TagType::Rlts,
            b"RLMC" => TagType::Rlmc,
            b"RLTP" => TagType::Rltp,
            other => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&other[..4.min(other.len())]);
                TagType::Unknown(raw)
            }
        }
    }
}

/// One animated property track addressing a single pane's target group.
#[derive(Debug, Clone)]
pub struct Track {
    /// Sub-target within the tag (e.g. which material-color channel byte).
    pub target_group: u8,
    /// Opcode selecting which pane/material field this track drives (see §4.10
    /// of the scene evaluation engine for the full table).
    pub opcode: u8,
    pub data_type: DataType,
    /// Sorted ascending by `frame` after normalization.
    pub keyframes: Vec<Keyframe>,
}

/// One tag's worth of tracks for a single pane.
#[derive(Debug, Clone)]
pub struct Tag {
    pub tag_type: TagType,
    pub entries: Vec<Track>,
}

/// All tracks belonging to one named pane within an animation.
#[derive(Debug, Clone)]
pub struct PaneAnim {
    pub name: String,
    pub tags: Vec<Tag>,
}

/// A fully-decoded BRLAN animation.
#[derive(Debug, Clone)]
pub struct Animation {
    pub frame_size: f32,
    pub loop_flag: bool,
    pub panes: Vec<PaneAnim>,
}

/// Controls for the single BRLAN-specific normalization quirk (see the open
/// question in the design notes): ported verbatim but kept isolated behind a
/// flag so it can be disabled if it turns out to be wrong for some asset.
#[derive(Debug, Clone, Copy)]
pub struct BrlanOptions {
    /// If every keyframe in a track has `frame <= 0` and the animation's
    /// `frame_size > 0`, shift every frame by `frame_size`. Default `true`.
    pub normalize_negative_frames: bool,
}

impl Default for BrlanOptions {
    fn default() -> Self {
        Self {
            normalize_negative_frames: true,
        }
    }
}

pub fn decode_brlan(
    data: &[u8],
    options: BrlanOptions,
    logger: &dyn Logger,
) -> Result<Animation, BannerError> {
    let mut reader = ByteReader::new(data);
    reader.forward_tag(b"RLAN")?;
    reader.skip(2)?; // BOM
    reader.skip(2)?; // version
    let _file_size = reader.u32()?;
    let _header_size = reader.u16()?;
    let _section_count = reader.u16()?;

    let section_start = reader.offset();
    let tag = reader.slice(4)?;
    if tag != b"pai1" {
        return Err(BannerError::bad_magic(format!(
            "expected pai1 section, found {:?}",
            String::from_utf8_lossy(tag)
        )));
    }
    let size = reader.u32()?;
    let body_end = section_start + size as usize;
    let body = data
        .get(reader.offset()..body_end)
        .ok_or_else(|| BannerError::truncated("pai1 section body"))?;

    parse_pai1(body, options, logger)
}

fn parse_pai1(
    body: &[u8],
    options: BrlanOptions,
    logger: &dyn Logger,
) -> Result<Animation, BannerError> {
    let mut r = ByteReader::new(body);
    let frame_size = r.u16()? as f32;
    let flags = r.u8()?;
    r.skip(1)?; // padding
    let num_panes = r.u16()?;
    r.skip(2)?; // padding

    let mut pane_offsets = Vec::with_capacity(num_panes as usize);
    for _ in 0..num_panes {
        pane_offsets.push(r.u32()?);
    }

    let mut panes = Vec::with_capacity(num_panes as usize);
    for offset in pane_offsets {
        match parse_pane_anim(body, offset as usize, frame_size, options, logger) {
            Ok(pane) => panes.push(pane),
            Err(e) => logger.error(&format!("brlan pane entry: {e}")),
        }
    }

    Ok(Animation {
        frame_size,
        loop_flag: flags & 0x01 != 0,
        panes,
    })
}

fn parse_pane_anim(
    body: &[u8],
    offset: usize,
    frame_size: f32,
    options: BrlanOptions,
    logger: &dyn Logger,
) -> Result<PaneAnim, BannerError> {
    let mut r = ByteReader::new_with(body, offset);
    let name = r.string(20)?;
    let num_tags = r.u8()?;
    r.skip(1)?; // padding

    let mut tag_offsets = Vec::with_capacity(num_tags as usize);
    for _ in 0..num_tags {
        tag_offsets.push(r.u32()?);
    }

    let mut tags = Vec::with_capacity(num_tags as usize);
    for tag_offset in tag_offsets {
        match parse_tag(body, tag_offset as usize, frame_size, options, logger) {
            Ok(tag) => tags.push(tag),
            Err(e) => logger.error(&format!("brlan tag for pane {name}: {e}")),
        }
    }

    Ok(PaneAnim { name, tags })
}

fn parse_tag(
    body: &[u8],
    offset: usize,
    frame_size: f32,
    options: BrlanOptions,
    logger: &dyn Logger,
) -> Result<Tag, BannerError> {
    let mut r = ByteReader::new_with(body, offset);
    let tag_bytes = r.slice(4)?;
    let tag_type = TagType::from_tag(tag_bytes);
    let num_entries = r.u16()?;
    r.skip(2)?; // padding

    let mut entry_offsets = Vec::with_capacity(num_entries as usize);
    for _ in 0..num_entries {
        entry_offsets.push(r.u32()?);
    }

    let mut entries = Vec::with_capacity(num_entries as usize);
    for entry_offset in entry_offsets {
        match parse_track(body, entry_offset as usize, frame_size, options) {
            Ok(track) => entries.push(track),
            Err(e) => logger.error(&format!("brlan track: {e}")),
        }
    }

    Ok(Tag { tag_type, entries })
}

fn parse_track(
    body: &[u8],
    offset: usize,
    frame_size: f32,
    options: BrlanOptions,
) -> Result<Track, BannerError> {
    let mut r = ByteReader::new_with(body, offset);
    let target_group = r.u8()?;
    let opcode = r.u8()?;
    let data_type_byte = r.u8()?;
    let data_type = DataType::from_byte(data_type_byte)
        .ok_or_else(|| BannerError::unsupported(format!("brlan dataType {data_type_byte}")))?;
    let num_keyframes = r.u16()?;
    let keyframe_offset = r.u32()?;

    let mut keyframes = Vec::with_capacity(num_keyframes as usize);
    let mut kr = ByteReader::new_with(body, keyframe_offset as usize);
    for _ in 0..num_keyframes {
        let keyframe = match data_type {
            DataType::Linear => Keyframe {
                frame: kr.f32()?,
                value: kr.f32()?,
                blend: 0.0,
            },
            DataType::Step => {
                let frame = kr.f32()?;
                let value = kr.u16()? as f32;
                kr.skip(2)?; // reserved
                Keyframe {
                    frame,
                    value,
                    blend: 0.0,
                }
            }
            DataType::Hermite => Keyframe {
                frame: kr.f32()?,
                value: kr.f32()?,
                blend: kr.f32()?,
            },
        };
        keyframes.push(keyframe);
    }

    normalize_frames(&mut keyframes, frame_size, options);
    keyframes.sort_by(|a, b| a.frame.partial_cmp(&b.frame).unwrap_or(std::cmp::Ordering::Equal));

    Ok(Track {
        target_group,
        opcode,
        data_type,
        keyframes,
    })
}

/// The "all non-positive frames get shifted by frameSize" quirk from the design
/// notes' open question: ported verbatim from the observed Nintendo asset
/// convention, isolated so it can be disabled via [`BrlanOptions`].
fn normalize_frames(keyframes: &mut [Keyframe], frame_size: f32, options: BrlanOptions) {
    if !options.normalize_negative_frames || frame_size <= 0.0 {
        return;
    }
    if keyframes.iter().all(|k| k.frame <= 0.0) {
        for k in keyframes.iter_mut() {
            k.frame += frame_size;
        }
    }
}
