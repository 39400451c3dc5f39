//! MJPEG multipart wire format

use bytes::{BufMut, Bytes, BytesMut};

/// Multipart boundary token
pub const MJPEG_BOUNDARY: &str = "frame";

/// Content type of the streaming response
pub const MJPEG_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Content type of each part and of snapshots
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

const PART_HEADER: &[u8] = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n";
const PART_TRAILER: &[u8] = b"\r\n";

/// Create MJPEG multipart frame bytes
///
/// Layout: `--frame\r\nContent-Type: image/jpeg\r\n\r\n<jpeg>\r\n`
pub fn create_mjpeg_part(jpeg_data: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(PART_HEADER.len() + jpeg_data.len() + PART_TRAILER.len());
    buf.put_slice(PART_HEADER);
    buf.put_slice(jpeg_data);
    buf.put_slice(PART_TRAILER);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_layout_is_exact() {
        let part = create_mjpeg_part(&[0xFF, 0xD8, 0x01, 0xFF, 0xD9]);
        let mut expected = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        expected.extend_from_slice(&[0xFF, 0xD8, 0x01, 0xFF, 0xD9]);
        expected.extend_from_slice(b"\r\n");
        assert_eq!(part.as_ref(), expected.as_slice());
    }

    #[test]
    fn test_boundary_matches_content_type() {
        assert!(MJPEG_CONTENT_TYPE.ends_with(&format!("boundary={}", MJPEG_BOUNDARY)));
        assert!(PART_HEADER.starts_with(format!("--{}\r\n", MJPEG_BOUNDARY).as_bytes()));
    }
}
