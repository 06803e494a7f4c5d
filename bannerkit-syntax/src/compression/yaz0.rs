//! Yaz0 decompression, Nintendo's other LZ variant used to wrap U8 archives.

use crate::error::BannerError;

/// Decode a `"Yaz0"` stream: 16-byte header (`"Yaz0"`, BE `u32` output size, 8
/// reserved bytes) followed by a bit-streamed control/literal/backref body.
pub fn decode_yaz0(data: &[u8]) -> Result<Vec<u8>, BannerError> {
    if data.len() < 16 || &data[0..4] != b"Yaz0" {
        return Err(BannerError::bad_magic("missing Yaz0 tag"));
    }

    let out_size = u32::from_be_bytes([data[4], data[5], data[6], data[7]]) as usize;
    let mut body = &data[16..];
    let mut out = Vec::with_capacity(out_size);

    let mut control_bits_left = 0u32;
    let mut control = 0u8;

    while out.len() < out_size {
        if control_bits_left == 0 {
            control = take_u8(&mut body)?;
            control_bits_left = 8;
        }

        let is_reference = control & 0x80 == 0;
        control <<= 1;
        control_bits_left -= 1;

        if is_reference {
            let b1 = take_u8(&mut body)?;
            let b2 = take_u8(&mut body)?;
            let dist = (((b1 & 0x0f) as usize) << 8) | b2 as usize;

            let copy_len = if b1 >> 4 == 0 {
                let ext = take_u8(&mut body)?;
                ext as usize + 0x12
            } else {
                (b1 >> 4) as usize + 2
            };

            let copy_len = copy_len.min(out_size - out.len());
            copy_backref(&mut out, dist, copy_len);
        } else {
            out.push(take_u8(&mut body)?);
        }
    }

    if out.len() != out_size {
        return Err(BannerError::malformed_stream(format!(
            "Yaz0 produced {} bytes, expected {out_size}",
            out.len()
        )));
    }

    Ok(out)
}

fn take_u8(body: &mut &[u8]) -> Result<u8, BannerError> {
    let (&first, rest) = body
        .split_first()
        .ok_or_else(|| BannerError::malformed_stream("Yaz0 stream ended early"))?;
    *body = rest;
    Ok(first)
}

fn copy_backref(out: &mut Vec<u8>, dist: usize, length: usize) {
    for _ in 0..length {
        let src = out.len().checked_sub(dist + 1);
        let byte = src.and_then(|i| out.get(i).copied()).unwrap_or(0);
        out.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_magic() {
        let data = [0u8; 16];
        assert!(decode_yaz0(&data).is_err());
    }

    #[test]
    fn decodes_all_literals() {
        let mut data = b"Yaz0\x00\x00\x00\x04".to_vec();
        data.extend_from_slice(&[0u8; 8]);
        data.push(0xf0); // top 4 control bits set -> 4 literals
        data.extend_from_slice(&[1, 2, 3, 4]);
        let out = decode_yaz0(&data).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn backref_repeats_prior_byte() {
        let mut data = b"Yaz0\x00\x00\x00\x04".to_vec();
        data.extend_from_slice(&[0u8; 8]);
        // control: bit7=1 (literal 'A'), bit6=0 (reference) -> 0b10000000
        data.push(0x80);
        data.push(b'A');
        // reference: b1 high nibble 0 means length = dist low nibble 0, b2=0, ext byte
        data.push(0x00);
        data.push(0x00);
        data.push(0x00); // ext -> length = 0 + 0x12 = 18, but out_size caps it at 4
        let out = decode_yaz0(&data).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], b'A');
    }
}
