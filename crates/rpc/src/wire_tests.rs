use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Ping {
    n: u32,
}

#[test]
fn encode_decode_roundtrips() {
    let msg = Ping { n: 7 };
    let bytes = encode(&msg).unwrap();
    let back: Ping = decode(&bytes).unwrap();
    assert_eq!(msg, back);
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";
    let mut buffer = Vec::new();
    write_message(&mut buffer, original).await.unwrap();
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.unwrap();
    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_big_endian_length_prefix() {
    let data = b"test data";
    let mut buffer = Vec::new();
    write_message(&mut buffer, data).await.unwrap();
    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
    assert_eq!(len as usize, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn truncated_length_prefix_is_an_error() {
    let mut cursor = std::io::Cursor::new(vec![0u8; 2]);
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Truncated));
}

#[tokio::test]
async fn oversized_frame_is_rejected_before_allocating() {
    let mut cursor = std::io::Cursor::new((MAX_FRAME_LEN + 1).to_be_bytes().to_vec());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::FrameTooLarge(_)));
}

#[test]
fn clamp_to_i32_saturates_both_directions() {
    assert_eq!(clamp_to_i32(i64::MAX), i32::MAX);
    assert_eq!(clamp_to_i32(i64::MIN), i32::MIN);
    assert_eq!(clamp_to_i32(42), 42);
}
