//! NDEF personalization settings

use std::fmt;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::ndef::{NdefEncoder, NdefRecord};
use crate::record::Record;
use crate::tag::Tag;

/// Card settings mask bits that control NDEF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NdefSetting {
    /// Answer NFC readers with an NDEF message
    UseNdef = 0x0200,
    /// Let the card append records after the precomputed ones
    UseDynamicNdef = 0x0400,
    /// Do not answer with the precomputed message
    DisablePrecomputedNdef = 0x0001_0000,
}

/// NDEF settings mask container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NdefSettings(u32);

impl fmt::Display for NdefSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut settings = Vec::new();
        if self.has_setting(NdefSetting::UseNdef) {
            settings.push("NDEF");
        }
        if self.has_setting(NdefSetting::UseDynamicNdef) {
            settings.push("Dynamic NDEF");
        }
        if self.has_setting(NdefSetting::DisablePrecomputedNdef) {
            settings.push("Precomputed NDEF disabled");
        }
        write!(f, "{}", settings.join(", "))
    }
}

impl NdefSettings {
    /// Combine the given settings
    pub fn new(settings: &[NdefSetting]) -> Self {
        Self(settings.iter().fold(0, |mask, &setting| mask | setting as u32))
    }

    /// Whether `setting` is enabled
    pub const fn has_setting(&self, setting: NdefSetting) -> bool {
        self.0 & setting as u32 != 0
    }

    /// Raw mask bits
    pub const fn bits(&self) -> u32 {
        self.0
    }
}

impl From<u32> for NdefSettings {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Validated NDEF configuration of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefConfig {
    use_ndef: bool,
    use_dynamic_ndef: bool,
    disable_precomputed_ndef: bool,
    records: Vec<NdefRecord>,
}

impl NdefConfig {
    /// Validate and create a configuration
    ///
    /// The dynamic and precomputed flags, and any records, only make sense
    /// with NDEF enabled. The records are encoded once so that an
    /// unsupported URI or an oversized value is reported here.
    pub fn new(
        use_ndef: bool,
        use_dynamic_ndef: bool,
        disable_precomputed_ndef: bool,
        records: Vec<NdefRecord>,
    ) -> Result<Self> {
        if !use_ndef {
            if use_dynamic_ndef {
                return Err(Error::Construction("Dynamic NDEF requires NDEF"));
            }
            if disable_precomputed_ndef {
                return Err(Error::Construction("Disabling precomputed NDEF requires NDEF"));
            }
            if !records.is_empty() {
                return Err(Error::Construction("NDEF records require NDEF"));
            }
        }

        let config = Self {
            use_ndef,
            use_dynamic_ndef,
            disable_precomputed_ndef,
            records,
        };
        config.ndef_data()?;
        Ok(config)
    }

    /// Configuration with NDEF turned off
    pub const fn disabled() -> Self {
        Self {
            use_ndef: false,
            use_dynamic_ndef: false,
            disable_precomputed_ndef: false,
            records: Vec::new(),
        }
    }

    /// Whether NDEF is enabled
    pub const fn use_ndef(&self) -> bool {
        self.use_ndef
    }

    /// Whether dynamic NDEF is enabled
    pub const fn use_dynamic_ndef(&self) -> bool {
        self.use_dynamic_ndef
    }

    /// Whether the precomputed message is disabled
    pub const fn disable_precomputed_ndef(&self) -> bool {
        self.disable_precomputed_ndef
    }

    /// Configured records
    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    /// Settings mask bits for this configuration
    pub fn settings(&self) -> NdefSettings {
        let mut settings = Vec::new();
        if self.use_ndef {
            settings.push(NdefSetting::UseNdef);
        }
        if self.use_dynamic_ndef {
            settings.push(NdefSetting::UseDynamicNdef);
        }
        if self.disable_precomputed_ndef {
            settings.push(NdefSetting::DisablePrecomputedNdef);
        }
        NdefSettings::new(&settings)
    }

    /// Precomputed NDEF message, empty when no records are configured
    pub fn ndef_data(&self) -> Result<Bytes> {
        if self.records.is_empty() {
            return Ok(Bytes::new());
        }
        NdefEncoder::new(self.records.clone(), self.use_dynamic_ndef).encode()
    }

    /// Precomputed NDEF message as a personalization record
    pub fn ndef_record(&self) -> Result<Record> {
        Ok(Record::new(Tag::NdefData, self.ndef_data()?))
    }
}

impl Default for NdefConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_mask() {
        let config = NdefConfig::new(true, true, false, vec![NdefRecord::aar("com.tangem")]).unwrap();
        let settings = config.settings();

        assert_eq!(settings.bits(), 0x0600);
        assert!(settings.has_setting(NdefSetting::UseDynamicNdef));
        assert!(!settings.has_setting(NdefSetting::DisablePrecomputedNdef));
        assert_eq!(settings.to_string(), "NDEF, Dynamic NDEF");
        assert_eq!(NdefSettings::from(0x0001_0200).to_string(), "NDEF, Precomputed NDEF disabled");
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            NdefConfig::new(false, true, false, Vec::new()),
            Err(Error::Construction(_))
        ));
        assert!(matches!(
            NdefConfig::new(false, false, true, Vec::new()),
            Err(Error::Construction(_))
        ));
        assert!(matches!(
            NdefConfig::new(false, false, false, vec![NdefRecord::text("x")]),
            Err(Error::Construction(_))
        ));
        assert!(matches!(
            NdefConfig::new(true, false, false, vec![NdefRecord::uri("tangem.com")]),
            Err(Error::UnsupportedUri(_))
        ));
    }

    #[test]
    fn test_ndef_data() {
        let config = NdefConfig::new(true, false, false, Vec::new()).unwrap();
        assert!(config.ndef_data().unwrap().is_empty());
        assert_eq!(NdefConfig::default(), NdefConfig::disabled());

        let config = NdefConfig::new(true, false, false, vec![NdefRecord::text("hi")]).unwrap();
        let record = config.ndef_record().unwrap();
        assert_eq!(record.tag(), Tag::NdefData);
        assert_eq!(record.len(), 11);
    }
}
