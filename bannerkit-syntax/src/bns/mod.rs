//! BNS streamed-audio decoder: a chunked container (`INFO`/`DATA`) wrapping one
//! DSP-ADPCM stream per channel.

use crate::byte_reader::ByteReader;
use crate::diagnostics::Logger;
use crate::error::BannerError;

const BNS_VERSION: u32 = 0xFEFF_0100;
/// Samples decoded from one 8-byte ADPCM frame (a 1-byte header plus 7 payload
/// bytes, each holding two 4-bit samples).
const SAMPLES_PER_FRAME: usize = 14;

/// Per-channel DSP-ADPCM decode state: 8 coefficient pairs and the initial
/// history samples carried over from the previous frame.
#[derive(Debug, Clone)]
struct ChannelInfo {
    coefficients: [i16; 16],
    initial_hist1: i16,
    initial_hist2: i16,
    data_offset: u32,
}

/// A fully-decoded streamed-audio track: one flat `i16` PCM buffer per channel.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    pub channel_count: u8,
    pub sample_rate: u32,
    pub sample_count: u32,
    pub loop_flag: bool,
    pub loop_start: u32,
    /// `pcm16[channel][sample]`.
    pub pcm16: Vec<Vec<i16>>,
}

pub fn decode_bns(data: &[u8], logger: &dyn Logger) -> Result<AudioTrack, BannerError> {
    let mut reader = ByteReader::new(data);
    reader.forward_tag(b"BNS ")?;
    let version = reader.u32()?;
    if version != BNS_VERSION {
        return Err(BannerError::unsupported(format!(
            "BNS version 0x{version:08x}"
        )));
    }
    let _file_size = reader.u32()?;
    let chunk_count = reader.u16()?;
    reader.skip(2)?; // reserved

    let mut info_body_offset = None;
    let mut data_body_offset = None;

    for _ in 0..chunk_count {
        let section_start = reader.offset();
        let Ok(tag) = reader.slice(4) else { break };
        let tag = tag.to_vec();
        let Ok(size) = reader.u32() else { break };
        if size < 8 {
            logger.error("BNS chunk with size < 8, aborting chunk walk");
            break;
        }
        let body_end = section_start + size as usize;
        let body_offset = reader.offset();

        match &tag[..] {
            b"INFO" => info_body_offset = Some(body_offset),
            b"DATA" => data_body_offset = Some(body_offset),
            other => logger.warn(&format!(
                "unrecognized BNS chunk {:?}, skipping",
                String::from_utf8_lossy(other)
            )),
        }

        reader.seek(body_end)?;
    }

    let info_offset =
        info_body_offset.ok_or_else(|| BannerError::bad_magic("BNS missing INFO chunk"))?;
    let data_offset =
        data_body_offset.ok_or_else(|| BannerError::bad_magic("BNS missing DATA chunk"))?;

    decode_info(data, info_offset, data_offset, logger)
}

fn decode_info(
    data: &[u8],
    info_offset: usize,
    data_offset: usize,
    logger: &dyn Logger,
) -> Result<AudioTrack, BannerError> {
    let mut r = ByteReader::new_with(data, info_offset);
    let _codec = r.u8()?;
    let loop_flag = r.u8()? != 0;
    let channel_count = r.u8()?;
    r.skip(1)?; // padding
    let sample_rate = r.u32()?;
    let loop_start = r.u32()?;
    let sample_count = r.u32()?;
    let channel_table_offset = r.u32()?;

    let mut channel_offsets = Vec::with_capacity(channel_count as usize);
    let mut tr = ByteReader::new_with(data, info_offset + channel_table_offset as usize);
    for _ in 0..channel_count {
        channel_offsets.push(tr.u32()?);
    }

    let frames_per_channel = (sample_count as usize).div_ceil(SAMPLES_PER_FRAME);

    let mut pcm16 = Vec::with_capacity(channel_count as usize);
    for (i, offset) in channel_offsets.into_iter().enumerate() {
        let channel = match read_channel_info(data, info_offset + offset as usize) {
            Ok(c) => c,
            Err(e) => {
                logger.warn(&format!("BNS channel {i}: {e}, substituting silence"));
                pcm16.push(vec![0i16; sample_count as usize]);
                continue;
            }
        };

        match decode_channel(
            data,
            data_offset + channel.data_offset as usize,
            &channel,
            frames_per_channel,
            sample_count as usize,
        ) {
            Ok(samples) => pcm16.push(samples),
            Err(e) => {
                logger.warn(&format!("BNS channel {i} ADPCM decode: {e}, substituting silence"));
                pcm16.push(vec![0i16; sample_count as usize]);
            }
        }
    }

    Ok(AudioTrack {
        channel_count,
        sample_rate,
        sample_count,
        loop_flag,
        loop_start,
        pcm16,
    })
}

fn read_channel_info(data: &[u8], offset: usize) -> Result<ChannelInfo, BannerError> {
    let mut r = ByteReader::new_with(data, offset);
    let mut coefficients = [0i16; 16];
    for c in coefficients.iter_mut() {
        *c = r.i16()?;
    }
    let _gain = r.u16()?;
    let _initial_predictor_scale = r.u16()?;
    let initial_hist1 = r.i16()?;
    let initial_hist2 = r.i16()?;
    let data_offset = r.u32()?;

    Ok(ChannelInfo {
        coefficients,
        initial_hist1,
        initial_hist2,
        data_offset,
    })
}

fn decode_channel(
    data: &[u8],
    offset: usize,
    channel: &ChannelInfo,
    frames: usize,
    sample_count: usize,
) -> Result<Vec<i16>, BannerError> {
    let mut out = Vec::with_capacity(sample_count);
    let mut hist1 = channel.initial_hist1 as i32;
    let mut hist2 = channel.initial_hist2 as i32;

    for f in 0..frames {
        let frame = data
            .get(offset + f * 8..offset + f * 8 + 8)
            .ok_or_else(|| BannerError::truncated(format!("ADPCM frame {f}")))?;

        decode_frame(
            frame,
            &channel.coefficients,
            &mut hist1,
            &mut hist2,
            &mut out,
            sample_count,
        );
    }

    out.truncate(sample_count);
    Ok(out)
}

fn decode_frame(
    frame: &[u8],
    coefficients: &[i16; 16],
    hist1: &mut i32,
    hist2: &mut i32,
    out: &mut Vec<i16>,
    sample_count: usize,
) {
    let header = frame[0];
    let predictor = (header >> 4) as usize & 0x7;
    let scale = 1i32 << (header & 0x0f);
    let coef1 = coefficients[predictor * 2] as i32;
    let coef2 = coefficients[predictor * 2 + 1] as i32;

    for &byte in &frame[1..8] {
        for shift in [4u8, 0] {
            if out.len() >= sample_count {
                return;
            }
            let raw = ((byte >> shift) & 0x0f) as i32;
            let nibble = if raw >= 8 { raw - 16 } else { raw };

            let mut sample = (nibble * scale) << 11;
            sample += 1024;
            sample += coef1 * *hist1 + coef2 * *hist2;
            sample >>= 11;
            let sample = sample.clamp(i16::MIN as i32, i16::MAX as i32);

            *hist2 = *hist1;
            *hist1 = sample;
            out.push(sample as i16);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullLogger;

    fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], body: &[u8]) {
        out.extend_from_slice(tag);
        out.extend_from_slice(&((body.len() + 8) as u32).to_be_bytes());
        out.extend_from_slice(body);
    }

    #[test]
    fn rejects_missing_magic() {
        let data = b"XXXX".to_vec();
        assert!(decode_bns(&data, &NullLogger).is_err());
    }

    #[test]
    fn decodes_a_single_silent_channel() {
        // INFO body: codec=0, loop=0, channels=1, pad, sampleRate, loopStart,
        // sampleCount=14 (one frame), channelTableOffset relative to INFO body.
        let mut info = Vec::new();
        info.push(0); // codec
        info.push(0); // loopFlag
        info.push(1); // channelCount
        info.push(0); // pad
        info.extend_from_slice(&32000u32.to_be_bytes());
        info.extend_from_slice(&0u32.to_be_bytes());
        info.extend_from_slice(&14u32.to_be_bytes()); // sampleCount
        let table_offset_slot = info.len();
        info.extend_from_slice(&0u32.to_be_bytes());

        let channel_table_offset = info.len() as u32;
        info[table_offset_slot..table_offset_slot + 4]
            .copy_from_slice(&channel_table_offset.to_be_bytes());

        let channel_info_offset = info.len() as u32 + 4;
        info.extend_from_slice(&channel_info_offset.to_be_bytes());

        // channel info: 16 zero coefficients, gain, initial ps, hist1=0, hist2=0, dataOffset=0
        info.extend_from_slice(&[0u8; 32]); // coefficients
        info.extend_from_slice(&0u16.to_be_bytes()); // gain
        info.extend_from_slice(&0u16.to_be_bytes()); // initial predictor/scale
        info.extend_from_slice(&0i16.to_be_bytes()); // hist1
        info.extend_from_slice(&0i16.to_be_bytes()); // hist2
        info.extend_from_slice(&0u32.to_be_bytes()); // dataOffset into DATA chunk

        // DATA body: one 8-byte all-zero ADPCM frame -> all samples silent.
        let data_body = vec![0u8; 8];

        let mut file = Vec::new();
        file.extend_from_slice(b"BNS ");
        file.extend_from_slice(&BNS_VERSION.to_be_bytes());
        file.extend_from_slice(&0u32.to_be_bytes()); // fileSize, unused
        file.extend_from_slice(&2u16.to_be_bytes()); // chunkCount
        file.extend_from_slice(&0u16.to_be_bytes()); // reserved
        write_chunk(&mut file, b"INFO", &info);
        write_chunk(&mut file, b"DATA", &data_body);

        let track = decode_bns(&file, &NullLogger).unwrap();
        assert_eq!(track.channel_count, 1);
        assert_eq!(track.sample_count, 14);
        assert_eq!(track.pcm16.len(), 1);
        assert_eq!(track.pcm16[0].len(), 14);
        assert!(track.pcm16[0].iter().all(|&s| s == 0));
    }
}
