//! End-to-end checks of record encoding against independent parsers

use hex_literal::hex;
use iso7816_tlv::simple::Tlv;
use nexum_card_data::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn personalization_records() -> Vec<Record> {
    vec![
        Record::new(Tag::CardId, hex!("CB79000000018201").to_vec()),
        Record::utf8(Tag::Unknown(0x20), "Tangem"),
        Record::uint8(Tag::PauseBeforePin2, 5),
        Record::uint16(Tag::Offset, 900),
        Record::bool(Tag::Unknown(0x5A), false),
        Record::new(Tag::Unknown(0x0B), Bytes::new()),
    ]
}

#[test]
fn test_encoding_is_deterministic() {
    init_tracing();

    for layout in [HeaderLayout::Static, HeaderLayout::Dynamic] {
        let first = RecordEncoder::new(personalization_records(), layout)
            .encode()
            .unwrap();
        let second = RecordEncoder::new(personalization_records(), layout)
            .encode()
            .unwrap();
        assert_eq!(first, second, "{layout}");
    }
}

#[test]
fn test_static_layout_is_simple_tlv_for_short_values() {
    init_tracing();

    let records = personalization_records();
    let encoded = RecordEncoder::new(records.clone(), HeaderLayout::Static)
        .encode()
        .unwrap();

    let parsed = Tlv::parse_all(&encoded);
    assert_eq!(parsed.len(), records.len());
    for (tlv, record) in parsed.iter().zip(&records) {
        let tag: u8 = tlv.tag().into();
        assert_eq!(tag, record.tag().code());
        assert_eq!(tlv.value(), record.value().as_ref());
    }
}

#[test]
fn test_static_layout_at_maximum_length_is_simple_tlv() {
    let records = vec![
        Record::new(Tag::IssuerData, vec![0x5Au8; 0xFE]),
        Record::uint8(Tag::CardId, 0x01),
    ];
    let encoded = RecordEncoder::new(records.clone(), HeaderLayout::Static)
        .encode()
        .unwrap();
    assert_eq!(&encoded[..2], &hex!("32 FE"));

    let parsed = Tlv::parse_all(&encoded);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].value(), records[0].value().as_ref());
    assert_eq!(parsed[1].value(), &[0x01]);

    assert_eq!(
        encoded,
        TlvBuilder::new()
            .push(records[0].clone())
            .push(records[1].clone())
            .serialize()
            .unwrap()
    );
}

#[test]
fn test_order_is_preserved() {
    let records = personalization_records();
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = RecordEncoder::new(records.clone(), HeaderLayout::Dynamic)
        .encode()
        .unwrap();
    let backward = RecordEncoder::new(reversed, HeaderLayout::Dynamic)
        .encode()
        .unwrap();
    assert_ne!(forward, backward);

    let decoded = RecordDecoder::new(HeaderLayout::Dynamic)
        .decode(&forward)
        .unwrap();
    let tags: Vec<Tag> = decoded.iter().map(Record::tag).collect();
    let expected: Vec<Tag> = records.iter().map(Record::tag).collect();
    assert_eq!(tags, expected);
}

#[test]
fn test_layout_only_matters_for_long_values() {
    let short = personalization_records();
    assert_eq!(
        RecordEncoder::new(short.clone(), true).encode().unwrap(),
        RecordEncoder::new(short, false).encode().unwrap()
    );

    let long = vec![Record::new(Tag::IssuerData, vec![0x11u8; 200])];
    let dynamic = RecordEncoder::new(long.clone(), true).encode().unwrap();
    let fixed = RecordEncoder::new(long, false).encode().unwrap();
    assert_eq!(dynamic.len(), fixed.len() + 1);
    assert_eq!(&dynamic[..3], &hex!("32 81 C8"));
    assert_eq!(&fixed[..2], &hex!("32 C8"));
}

#[test]
fn test_overflow_fails_whole_encode() {
    let mut records = personalization_records();
    records.insert(1, Record::new(Tag::IssuerData, vec![0u8; 0xFF]));

    let encoder = RecordEncoder::new(records, HeaderLayout::Static);
    assert!(matches!(
        encoder.encode(),
        Err(Error::EncodingOverflow {
            length: 0xFF,
            max: 0xFE
        })
    ));
    assert!(encoder.encoded_len().is_err());
}

#[test]
fn test_builder_feeds_encoder() {
    let builder = TlvBuilder::new()
        .append(Tag::CardId, hex!("CB79000000018201").to_vec())
        .append_u32(Tag::IssuerDataCounter, 1);

    let encoded = builder.clone().into_encoder(false).encode().unwrap();
    assert_eq!(encoded, builder.serialize().unwrap());
    assert_eq!(
        encoded.as_ref(),
        &hex!("01 08 CB79000000018201 35 04 00000001")
    );
}
