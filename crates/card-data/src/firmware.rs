//! Card firmware versions and version ranges
//!
//! Cards report their firmware as a string such as `4.52r` or `3.29d SDK`.
//! Payloads that only some firmware understands declare an inclusive
//! [`FirmwareRange`] through [`FirmwareRestricted`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use derive_more::Display;

use crate::error::{Error, Result};

const SDK_SUFFIX: &str = "d SDK";
const RELEASE_SUFFIX: &str = "r";

/// Build flavour of a card firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FirmwareType {
    /// Development firmware (`d SDK`)
    Sdk,
    /// Production firmware (`r` or no suffix)
    #[default]
    Release,
    /// Any other suffix
    Special,
}

impl FirmwareType {
    /// Suffix written after the numeric version
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Sdk => SDK_SUFFIX,
            Self::Release => RELEASE_SUFFIX,
            Self::Special => "",
        }
    }

    fn from_suffix(suffix: &str) -> Self {
        match suffix.trim() {
            "" | RELEASE_SUFFIX => Self::Release,
            SDK_SUFFIX => Self::Sdk,
            _ => Self::Special,
        }
    }
}

/// Firmware version reported by a card
///
/// Ordering and equality only look at `major.minor.patch`; the firmware
/// type does not make a version newer or older.
#[derive(Debug, Clone, Copy)]
pub struct FirmwareVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
    /// Build flavour
    pub kind: FirmwareType,
}

impl FirmwareVersion {
    /// Lowest possible version
    pub const MIN: Self = Self::new(0, 0, 0);
    /// Highest possible version
    pub const MAX: Self = Self::new(u32::MAX, 0, 0);
    /// Files can be read and written
    pub const FILES_AVAILABLE: Self = Self::new(3, 29, 0);
    /// Files can be protected by the passcode
    pub const PASSCODE_PROTECTED_FILES_AVAILABLE: Self = Self::new(3, 34, 0);
    /// Cards hold more than one wallet
    pub const MULTI_WALLET_AVAILABLE: Self = Self::new(4, 0, 0);
    /// HD wallets
    pub const HD_WALLET_AVAILABLE: Self = Self::new(4, 28, 0);
    /// Backup
    pub const BACKUP_AVAILABLE: Self = Self::new(4, 43, 0);

    /// Create a release version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            kind: FirmwareType::Release,
        }
    }

    /// Set the firmware type
    pub const fn with_kind(mut self, kind: FirmwareType) -> Self {
        self.kind = kind;
        self
    }

    const fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

impl PartialEq for FirmwareVersion {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for FirmwareVersion {}

impl PartialOrd for FirmwareVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FirmwareVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.patch != 0 {
            write!(f, ".{}", self.patch)?;
        }
        f.write_str(self.kind.suffix())
    }
}

impl FromStr for FirmwareVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let cleaned = s.trim_end_matches('\0');
        let split = cleaned
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(cleaned.len());
        let (numbers, suffix) = cleaned.split_at(split);

        let mut parts = numbers.split('.').filter(|part| !part.is_empty());
        let mut next = || -> Result<u32> {
            parts
                .next()
                .map_or(Ok(0), |part| part.parse::<u32>())
                .map_err(|_| Error::InvalidFirmwareVersion(s.to_string()))
        };

        if !numbers.bytes().any(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidFirmwareVersion(s.to_string()));
        }

        Ok(Self {
            major: next()?,
            minor: next()?,
            patch: next()?,
            kind: FirmwareType::from_suffix(suffix),
        })
    }
}

impl TryFrom<&str> for FirmwareVersion {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

/// Inclusive range of firmware versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("[{min}, {max}]")]
pub struct FirmwareRange {
    min: FirmwareVersion,
    max: FirmwareVersion,
}

impl FirmwareRange {
    /// Every firmware version
    pub const ANY: Self = Self::from_bounds(FirmwareVersion::MIN, FirmwareVersion::MAX);

    /// Create a range, rejecting `min > max`
    pub fn new(min: FirmwareVersion, max: FirmwareVersion) -> Result<Self> {
        if min > max {
            return Err(Error::Construction("Minimum firmware is above the maximum"));
        }
        Ok(Self { min, max })
    }

    pub(crate) const fn from_bounds(min: FirmwareVersion, max: FirmwareVersion) -> Self {
        Self { min, max }
    }

    /// Lowest supported version
    pub const fn min(&self) -> FirmwareVersion {
        self.min
    }

    /// Highest supported version
    pub const fn max(&self) -> FirmwareVersion {
        self.max
    }

    /// Whether `version` lies inside the range
    pub fn contains(&self, version: &FirmwareVersion) -> bool {
        self.min <= *version && *version <= self.max
    }
}

/// Something that is only understood by a bounded range of card firmware
pub trait FirmwareRestricted {
    /// Lowest firmware that understands this value
    fn min_firmware_version(&self) -> FirmwareVersion;

    /// Highest firmware that understands this value
    fn max_firmware_version(&self) -> FirmwareVersion;

    /// Both bounds as a range
    fn firmware_range(&self) -> FirmwareRange {
        FirmwareRange::from_bounds(self.min_firmware_version(), self.max_firmware_version())
    }

    /// Whether a card running `version` understands this value
    fn supports(&self, version: &FirmwareVersion) -> bool {
        self.firmware_range().contains(version)
    }

    /// Fail with [`Error::FirmwareIncompatible`] unless `version` is supported
    fn ensure_supported(&self, version: &FirmwareVersion) -> Result<()> {
        if self.supports(version) {
            Ok(())
        } else {
            Err(Error::FirmwareIncompatible {
                version: *version,
                min: self.min_firmware_version(),
                max: self.max_firmware_version(),
            })
        }
    }
}

impl FirmwareRestricted for FirmwareRange {
    fn min_firmware_version(&self) -> FirmwareVersion {
        self.min
    }

    fn max_firmware_version(&self) -> FirmwareVersion {
        self.max
    }
}
