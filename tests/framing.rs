//! Integration tests for packet framing through the blocking reader and writer
//!
//! Every supported packet variant is built, written, and read back; legacy
//! headers of each length type are decoded from hand-assembled octets.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use pgp_framing::packets::{
    CompressedData, KeyMaterial, LiteralData, LiteralFormat, Marker, OnePassSignature, PublicKey,
    PublicKeyEncryptedSessionKey, PublicSubkey, SecretKey, SecretSubkey, Signature,
    SymEncryptedData, SymKeyEncryptedSessionKey, Trust, UserId,
};
use pgp_framing::{BodyLength, KeyId, Metrics, Packet, PacketReader, PacketWriter, Tag};
use std::sync::Arc;

const KEY_ID: [u8; 8] = [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04];

fn key() -> KeyMaterial {
    KeyMaterial::v4(1_600_000_000, 1, vec![0x00, 0x08, 0xC5])
}

fn one_of_each() -> Vec<Packet> {
    vec![
        PublicKeyEncryptedSessionKey::new(KeyId::from(KEY_ID), 1, vec![0, 8, 0xAB])
            .unwrap()
            .into(),
        Signature::new(vec![4, 0x13, 1, 8, 0, 0]).unwrap().into(),
        SymKeyEncryptedSessionKey::new(9, vec![3, 8, 0x11, 0x22]).unwrap().into(),
        OnePassSignature::new(0, 8, 1, KeyId::from(KEY_ID), true).unwrap().into(),
        SecretKey::new(key()).unwrap().into(),
        PublicKey::new(key()).unwrap().into(),
        SecretSubkey::new(key()).unwrap().into(),
        CompressedData::new(1, vec![0x78, 0x9C, 0x03, 0x00]).unwrap().into(),
        SymEncryptedData::new(vec![0x55; 40]).unwrap().into(),
        Marker::new().unwrap().into(),
        LiteralData::new(LiteralFormat::Text, b"msg.txt".to_vec(), 0, b"hello\r\n".to_vec())
            .unwrap()
            .into(),
        Trust::new(vec![0x05, 0x3C]).unwrap().into(),
        UserId::new("Joe Bloggs <joe@example.com>").unwrap().into(),
        PublicSubkey::new(key()).unwrap().into(),
    ]
}

#[test]
fn test_every_variant_survives_the_wire() {
    let packets = one_of_each();
    let tags: Vec<Tag> = packets.iter().map(Packet::tag).collect();
    assert_eq!(tags, Tag::ALL.to_vec());

    let mut writer = PacketWriter::new(Vec::new());
    for packet in &packets {
        writer.write_packet(packet).unwrap();
    }
    let wire = writer.into_inner();

    let decoded: Vec<Packet> = PacketReader::new(wire.as_slice())
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(decoded.len(), packets.len());
    for (original, decoded) in packets.iter().zip(&decoded) {
        assert_eq!(decoded.tag(), original.tag());
        assert_eq!(decoded.body_bytes(), original.body_bytes());
        assert_eq!(
            decoded.header().length().declared(),
            Some(original.body_bytes().len() as u32)
        );
    }
}

#[test]
fn test_decoded_fields() {
    let mut writer = PacketWriter::new(Vec::new());
    for packet in one_of_each() {
        writer.write_packet(&packet).unwrap();
    }
    let wire = writer.into_inner();
    let mut reader = PacketReader::new(wire.as_slice());

    match reader.read_packet().unwrap() {
        Some(Packet::PublicKeyEncryptedSessionKey(p)) => {
            assert_eq!(p.key_id().as_bytes(), &KEY_ID);
            assert_eq!(p.algorithm(), 1);
            assert_eq!(p.encrypted_key(), &[0, 8, 0xAB]);
        }
        other => panic!("unexpected {other:?}"),
    }
    match reader.read_packet().unwrap() {
        Some(Packet::Signature(s)) => {
            assert_eq!(s.version(), 4);
            assert_eq!(s.signature_type(), 0x13);
            assert_eq!(s.public_key_algorithm(), 1);
            assert_eq!(s.hash_algorithm(), 8);
        }
        other => panic!("unexpected {other:?}"),
    }
    reader.read_packet().unwrap();
    match reader.read_packet().unwrap() {
        Some(Packet::OnePassSignature(p)) => {
            assert_eq!(p.key_id().to_string(), "DEADBEEF01020304");
            assert!(p.is_last());
        }
        other => panic!("unexpected {other:?}"),
    }
    match reader.read_packet().unwrap() {
        Some(Packet::SecretKey(k)) => {
            assert_eq!(k.key().version(), 4);
            assert_eq!(k.key().created(), 1_600_000_000);
            assert_eq!(k.key().material(), &[0x00, 0x08, 0xC5]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_legacy_headers_of_each_length_type() {
    let mut wire = Vec::new();
    // user id, one-octet length
    wire.extend_from_slice(&[0xB4, 3]);
    wire.extend_from_slice(b"abc");
    // trust, two-octet length
    wire.extend_from_slice(&[0xB1, 0x01, 0x00]);
    wire.extend(std::iter::repeat(7u8).take(256));
    // symmetrically encrypted data, four-octet length
    wire.extend_from_slice(&[0xA6, 0, 0, 0, 2, 0xEE, 0xFF]);
    // trust, indeterminate, runs to the end
    wire.extend_from_slice(&[0xB3, 1, 2]);

    let mut reader = PacketReader::new(wire.as_slice());

    let p = reader.read_packet().unwrap().unwrap();
    assert_eq!(p.tag(), Tag::UserId);
    assert!(!p.header().is_new_format());
    assert_eq!(p.body_bytes(), b"abc".to_vec());

    let p = reader.read_packet().unwrap().unwrap();
    assert_eq!(p.tag(), Tag::Trust);
    assert_eq!(p.header().length(), BodyLength::Fixed(256));

    let p = reader.read_packet().unwrap().unwrap();
    assert_eq!(p.tag(), Tag::SymEncryptedData);
    assert_eq!(p.body_bytes(), vec![0xEE, 0xFF]);

    let p = reader.read_packet().unwrap().unwrap();
    assert_eq!(p.header().length(), BodyLength::Indeterminate);
    assert_eq!(p.body_bytes(), vec![1, 2]);

    assert!(reader.read_packet().unwrap().is_none());
}

#[test]
fn test_legacy_header_reencodes_as_new_format() {
    let wire = [0xB4, 3, b'a', b'b', b'c'];
    let packet = PacketReader::new(&wire[..]).read_packet().unwrap().unwrap();
    assert_eq!(packet.to_bytes().unwrap(), vec![0xCD, 3, b'a', b'b', b'c']);
}

#[test]
fn test_large_literal_uses_five_octet_length() {
    let data = vec![0x42; 10_000];
    let packet = Packet::from(LiteralData::binary(data.clone()).unwrap());
    let wire = packet.to_bytes().unwrap();
    assert_eq!(&wire[..6], &[0xCB, 0xFF, 0, 0, 0x27, 0x16]);

    let decoded = PacketReader::new(wire.as_slice()).read_packet().unwrap().unwrap();
    match decoded {
        Packet::LiteralData(lit) => {
            assert_eq!(lit.format(), LiteralFormat::Binary);
            assert_eq!(lit.data(), data.as_slice());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_shared_metrics() {
    let metrics = Arc::new(Metrics::new());
    let mut writer = PacketWriter::new(Vec::new()).with_metrics(Arc::clone(&metrics));
    writer.write_packet(&Marker::new().unwrap().into()).unwrap();
    writer.write_packet(&UserId::new("x").unwrap().into()).unwrap();
    let wire = writer.into_inner();

    let reader = PacketReader::new(wire.as_slice()).with_metrics(Arc::clone(&metrics));
    assert_eq!(reader.count(), 2);

    let s = metrics.snapshot();
    assert_eq!(s.packets_written, 2);
    assert_eq!(s.bytes_written, wire.len() as u64);
    assert_eq!(s.packets_read, 2);
    assert_eq!(s.body_bytes_read, 4);
}
