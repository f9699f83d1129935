//! Card tag identifiers
//!
//! Every record written to the card starts with a one-byte tag that names
//! the semantic kind of the value that follows.

use std::fmt;

macro_rules! tags {
    (@mask masked) => { true };
    (@mask) => { false };
    (
        $(
            $(#[$meta:meta])*
            $name:ident = $code:literal $(, $mask:ident)?;
        )*
    ) => {
        /// Semantic kind of a record, encoded as its leading tag byte
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Tag {
            $(
                $(#[$meta])*
                $name,
            )*
            /// Any tag byte without a named kind
            Unknown(u8),
        }

        impl Tag {
            /// Tag byte written on the wire
            pub const fn code(self) -> u8 {
                match self {
                    $(Self::$name => $code,)*
                    Self::Unknown(code) => code,
                }
            }

            /// Whether values under this tag must be hidden from log output
            pub const fn should_mask(self) -> bool {
                match self {
                    $(Self::$name => tags!(@mask $($mask)?),)*
                    Self::Unknown(_) => false,
                }
            }

            const fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$name => Some(stringify!($name)),)*
                    Self::Unknown(_) => None,
                }
            }
        }

        impl From<u8> for Tag {
            fn from(code: u8) -> Self {
                match code {
                    $($code => Self::$name,)*
                    other => Self::Unknown(other),
                }
            }
        }
    };
}

tags! {
    /// Card identifier
    CardId = 0x01, masked;
    /// Card public key
    CardPublicKey = 0x03, masked;
    /// Card signature
    CardSignature = 0x04, masked;
    /// Pause before passcode verification
    PauseBeforePin2 = 0x09;
    /// Manufacturer card data template
    CardData = 0x0C, masked;
    /// Precomputed NDEF message
    NdefData = 0x0D;
    /// Access code hash
    Pin = 0x10, masked;
    /// Passcode hash
    Pin2 = 0x11, masked;
    /// New access code hash
    NewPin = 0x12, masked;
    /// New passcode hash
    NewPin2 = 0x13, masked;
    /// Card verification code
    Cvc = 0x19, masked;
    /// New PIN3 hash
    NewPin3 = 0x1E, masked;
    /// Interaction mode of a multi-step command
    InteractionMode = 0x23;
    /// Byte offset of a chunk within a file
    Offset = 0x24;
    /// Total size of a file
    Size = 0x25;
    /// Index of a file on the card
    FileIndex = 0x26;
    /// File permission settings
    FileSettings = 0x27;
    /// Issuer data public key
    IssuerPublicKey = 0x30, masked;
    /// Issuer data chunk
    IssuerData = 0x32, masked;
    /// Issuer signature over file data
    IssuerDataSignature = 0x33, masked;
    /// Anti-replay counter for issuer data
    IssuerDataCounter = 0x35;
    /// SHA-256 of the written file
    CodeHash = 0x42;
    /// Index of a wallet on the card
    WalletIndex = 0x65;
    /// Number of wallets created at personalization
    WalletsCount = 0x66;
    /// File contents
    FileData = 0x71, masked;
    /// File owner signature
    FileSignature = 0x73, masked;
    /// File counter
    FileCounter = 0x74;
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag.code()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "TAG_{}", name),
            None => write!(f, "TAG_0x{:02X}", self.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_code_round_trip() {
        for code in 0..=u8::MAX {
            assert_eq!(Tag::from(code).code(), code);
        }
    }

    #[test]
    fn test_known_tags() {
        assert_eq!(Tag::from(0x0D), Tag::NdefData);
        assert_eq!(Tag::from(0x33), Tag::IssuerDataSignature);
        assert_eq!(Tag::from(0xEE), Tag::Unknown(0xEE));
        assert_eq!(u8::from(Tag::CodeHash), 0x42);
    }

    #[test]
    fn test_masking() {
        assert!(Tag::Pin2.should_mask());
        assert!(Tag::IssuerDataSignature.should_mask());
        assert!(!Tag::IssuerDataCounter.should_mask());
        assert!(!Tag::Unknown(0x02).should_mask());
    }

    #[test]
    fn test_display() {
        assert_eq!(Tag::CardId.to_string(), "TAG_CardId");
        assert_eq!(Tag::Unknown(0x02).to_string(), "TAG_0x02");
    }
}
