//! NDEF configuration through to the personalization record

use hex_literal::hex;
use nexum_card_data::prelude::*;
use nexum_card_data::{NdefSetting, RecordDecoder};

#[test]
fn test_config_produces_personalization_record() {
    let config = NdefConfig::new(
        true,
        true,
        false,
        vec![
            NdefRecord::uri("https://tangem.com"),
            NdefRecord::aar("com.tangem.wallet"),
        ],
    )
    .unwrap();

    assert!(config.settings().has_setting(NdefSetting::UseNdef));
    assert!(config.settings().has_setting(NdefSetting::UseDynamicNdef));

    let record = config.ndef_record().unwrap();
    let encoded = RecordEncoder::new(vec![record.clone()], HeaderLayout::Dynamic)
        .encode()
        .unwrap();

    // 2 byte prefix + 15 byte URI record + 35 byte AAR record
    assert_eq!(record.len(), 52);
    assert_eq!(&encoded[..5], &hex!("0D 34 0032 91"));

    let decoded = RecordDecoder::new(HeaderLayout::Dynamic)
        .decode(&encoded)
        .unwrap();
    assert_eq!(decoded, vec![record]);
}

#[test]
fn test_disabled_config_has_no_message() {
    let config = NdefConfig::disabled();
    assert_eq!(config.settings().bits(), 0);
    assert!(config.ndef_data().unwrap().is_empty());
    assert!(config.ndef_record().unwrap().is_empty());
}

#[test]
fn test_message_overflow_is_reported_at_construction() {
    let records = (0..400)
        .map(|index| NdefRecord::text(format!("record {index:03} {}", "x".repeat(200))))
        .collect();

    assert!(matches!(
        NdefConfig::new(true, false, false, records),
        Err(Error::EncodingOverflow { max: 0xFFFF, .. })
    ));
}
