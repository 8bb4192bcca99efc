use std::{fmt, str};

use fstr::FStr;

use crate::Error;

/// Represents a Universally Unique IDentifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Creates a UUID from a 16-byte big-endian array.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// [`FStr`] that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv1::Uuid;
    ///
    /// let x = "C232AB00941411ECB3C49A448486C3C8".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(y.as_str(), "c232ab00-9414-11ec-b3c4-9a448486c3c8");
    /// assert_eq!(format!("{}", y), "c232ab00-9414-11ec-b3c4-9a448486c3c8");
    /// # Ok::<(), uuidv1::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for (i, e) in self.0.iter().enumerate() {
            let e = *e as usize;
            *buf_iter.next().unwrap() = DIGITS[e >> 4];
            *buf_iter.next().unwrap() = DIGITS[e & 15];
            if i == 3 || i == 5 || i == 7 || i == 9 {
                *buf_iter.next().unwrap() = b'-';
            }
        }
        debug_assert!(buffer.is_ascii());
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Reports the variant field value of the UUID, classified by the top bits of the
    /// `clock_seq_hi_and_reserved` byte.
    pub const fn variant(&self) -> Variant {
        Variant::from_clock_seq_hi(self.0[8])
    }

    /// Returns the 4-bit version field value of the UUID.
    ///
    /// Unlike the variant, the version is reported as-is for any input; only version 1 is
    /// produced by this crate.
    pub const fn version(&self) -> u8 {
        self.0[6] >> 4
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from 32 hexadecimal digits, ignoring hyphens wherever they appear.
    ///
    /// The length is checked before the digits, so a short input with a stray character reports
    /// [`Error::InvalidLength`] rather than [`Error::InvalidFormat`].
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let digits = || src.chars().filter(|&c| c != '-');
        let len = digits().count();
        if len != 32 {
            return Err(Error::InvalidLength { len });
        }

        let mut dst = [0u8; 16];
        let mut iter = digits().map(|c| c.to_digit(16).ok_or(Error::InvalidFormat));
        for e in dst.iter_mut() {
            let hi = iter.next().ok_or(Error::InvalidFormat)?? as u8;
            let lo = iter.next().ok_or(Error::InvalidFormat)?? as u8;
            *e = (hi << 4) | lo;
        }
        Ok(Self(dst))
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

/// The reserved variants of UUIDs, told apart by the leading bits of octet 8.
///
/// | Variant     | Leading bits | `clock_seq_hi_and_reserved` |
/// | ----------- | ------------ | --------------------------- |
/// | [`Ncs`]       | `0`          | `0x00..=0x7f`               |
/// | [`Rfc4122`]   | `10`         | `0x80..=0xbf`               |
/// | [`Microsoft`] | `110`        | `0xc0..=0xdf`               |
/// | [`Future`]    | `111`        | `0xe0..=0xff`               |
///
/// [`Ncs`]: Variant::Ncs
/// [`Rfc4122`]: Variant::Rfc4122
/// [`Microsoft`]: Variant::Microsoft
/// [`Future`]: Variant::Future
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum Variant {
    /// Reserved for NCS backward compatibility.
    Ncs,
    /// The variant specified by RFC 4122.
    #[default]
    Rfc4122,
    /// Reserved for Microsoft Corporation backward compatibility.
    Microsoft,
    /// Reserved for future definition.
    Future,
}

impl Variant {
    /// Classifies a `clock_seq_hi_and_reserved` byte.
    pub const fn from_clock_seq_hi(octet: u8) -> Self {
        match octet >> 5 {
            0b000..=0b011 => Self::Ncs,
            0b100..=0b101 => Self::Rfc4122,
            0b110 => Self::Microsoft,
            _ => Self::Future,
        }
    }

    /// Returns the bits of `clock_seq_hi_and_reserved` claimed by this variant.
    pub const fn mask(self) -> u8 {
        match self {
            Self::Ncs => 0x80,
            Self::Rfc4122 => 0xc0,
            Self::Microsoft | Self::Future => 0xe0,
        }
    }

    /// Returns the value the claimed bits take under this variant.
    pub const fn pattern(self) -> u8 {
        match self {
            Self::Ncs => 0x00,
            Self::Rfc4122 => 0x80,
            Self::Microsoft => 0xc0,
            Self::Future => 0xe0,
        }
    }

    /// Stamps this variant onto the high six clock sequence bits, overwriting whatever bits the
    /// variant claims.
    pub const fn stamp(self, clock_seq_hi: u8) -> u8 {
        (clock_seq_hi & !self.mask()) | self.pattern()
    }

    /// Parses a variant name, falling back to [`Variant::Rfc4122`] when the name is not
    /// recognized.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(variant = name, "unrecognized variant, falling back to RFC4122");
            Self::Rfc4122
        })
    }

    /// Returns the display name of the variant.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ncs => "NCS",
            Self::Rfc4122 => "RFC4122",
            Self::Microsoft => "Microsoft",
            Self::Future => "Future",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl str::FromStr for Variant {
    type Err = Error;

    /// Parses a variant name case-insensitively.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        [Self::Ncs, Self::Rfc4122, Self::Microsoft, Self::Future]
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(src))
            .ok_or_else(|| Error::InvalidVariant(src.to_owned()))
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid, Variant};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Variant {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> serde::Deserialize<'de> for Variant {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_str(VariantVisitor)
        }
    }

    struct VariantVisitor;

    impl<'de> de::Visitor<'de> for VariantVisitor {
        type Value = Variant;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "one of NCS, RFC4122, Microsoft, or Future")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }
    }

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{Uuid, Variant};
    use crate::Error;

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [(u128, &'static str)] {
        &[
            (0, "00000000-0000-0000-0000-000000000000"),
            (
                0xc232ab00_9414_11ec_b3c4_9a448486c3c8,
                "c232ab00-9414-11ec-b3c4-9a448486c3c8",
            ),
            (
                0x20616934_4ba2_11e7_8000_010203040506,
                "20616934-4ba2-11e7-8000-010203040506",
            ),
            (u128::MAX, "ffffffff-ffff-ffff-ffff-ffffffffffff"),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (value, text) in prepare_cases() {
            let e = Uuid::from(*value);
            assert_eq!(Ok(e), text.parse());
            assert_eq!(Ok(e), text.to_uppercase().parse());
            assert_eq!(Ok(e), text.replace('-', "").parse());
            assert_eq!(e.encode().as_str(), *text);
            assert_eq!(&e.to_string(), text);
        }
    }

    /// Ignores hyphens wherever they appear
    #[test]
    fn ignores_hyphens_wherever_they_appear() {
        let expected = "c232ab00-9414-11ec-b3c4-9a448486c3c8".parse::<Uuid>();
        for e in [
            "c232ab009414-11ec-b3c4-9a448486c3c8",
            "-c232ab00-9414-11ec-b3c4-9a448486c3c8-",
            "c2-32-ab-00-94-14-11-ec-b3-c4-9a-44-84-86-c3-c8",
            "c232ab00--9414--11ec--b3c4--9a448486c3c8",
        ] {
            assert_eq!(e.parse::<Uuid>(), expected);
        }
    }

    /// Returns length error before format error
    #[test]
    fn returns_length_error_before_format_error() {
        let cases = [
            ("", 0),
            ("c232ab00-9414-11ec-b3c4-9a448486c3c", 31),
            ("c232ab00-9414-11ec-b3c4-9a448486c3c80", 33),
            ("{c232ab00-9414-11ec-b3c4-9a448486c3c8}", 34),
            (" c232ab00-9414-11ec-b3c4-9a448486c3c8", 33),
            ("zz", 2),
        ];

        for (e, len) in cases {
            assert_eq!(e.parse::<Uuid>(), Err(Error::InvalidLength { len }));
        }
    }

    /// Returns format error to non-hexadecimal digits
    #[test]
    fn returns_format_error_to_non_hexadecimal_digits() {
        let cases = [
            "c232ag00-9414-11ec-b3c4-9a448486c3c8",
            "c232ab00-9414-11ec-b3c4_9a448486c3c",
            "c232ab00 9414-11ec-b3c4-9a448486c3c",
            "+c232ab0-9414-11ec-b3c4-9a448486c3c8",
            "c232ab00-9414-11ec-b3c4-9a448486c3cé",
        ];

        for e in cases {
            assert_eq!(e.parse::<Uuid>(), Err(Error::InvalidFormat));
        }
    }

    /// Returns Nil and Max UUIDs
    #[test]
    fn returns_nil_and_max_uuids() {
        assert_eq!(
            Uuid::NIL.encode().as_str(),
            "00000000-0000-0000-0000-000000000000"
        );

        assert_eq!(
            Uuid::MAX.encode().as_str(),
            "ffffffff-ffff-ffff-ffff-ffffffffffff"
        );
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (value, _) in prepare_cases() {
            let e = Uuid::from(*value);
            assert_eq!(Uuid::from(<[u8; 16]>::from(e)), e);
            assert_eq!(u128::from(e), *value);
            assert_eq!(e.encode().parse(), Ok(e));
            assert_eq!(Uuid::try_from(e.to_string()), Ok(e));
            assert_eq!(Uuid::try_from(e.to_string().to_uppercase()), Ok(e));
            #[cfg(feature = "uuid")]
            assert_eq!(Uuid::from(<uuid::Uuid>::from(e)), e);
            #[cfg(feature = "uuid")]
            assert_eq!(uuid::Uuid::from(e).as_u128(), u128::from(e));
        }
    }

    /// Classifies variant boundaries
    #[test]
    fn classifies_variant_boundaries() {
        let cases = [
            (0x00, Variant::Ncs),
            (0x7f, Variant::Ncs),
            (0x80, Variant::Rfc4122),
            (0xbf, Variant::Rfc4122),
            (0xc0, Variant::Microsoft),
            (0xdf, Variant::Microsoft),
            (0xe0, Variant::Future),
            (0xff, Variant::Future),
        ];

        for (octet, variant) in cases {
            assert_eq!(Variant::from_clock_seq_hi(octet), variant);
            let mut bytes = [0u8; 16];
            bytes[8] = octet;
            assert_eq!(Uuid::from(bytes).variant(), variant);
        }
    }

    /// Stamps variant bits without touching unclaimed bits
    #[test]
    fn stamps_variant_bits_without_touching_unclaimed_bits() {
        for hi in 0..0x40u8 {
            for v in [
                Variant::Ncs,
                Variant::Rfc4122,
                Variant::Microsoft,
                Variant::Future,
            ] {
                let stamped = v.stamp(hi);
                assert_eq!(Variant::from_clock_seq_hi(stamped), v);
                assert_eq!(stamped & !v.mask(), hi & !v.mask());
            }
        }
    }

    /// Parses variant names case-insensitively
    #[test]
    fn parses_variant_names_case_insensitively() {
        assert_eq!("ncs".parse(), Ok(Variant::Ncs));
        assert_eq!("RFC4122".parse(), Ok(Variant::Rfc4122));
        assert_eq!("rfc4122".parse(), Ok(Variant::Rfc4122));
        assert_eq!("MICROSOFT".parse(), Ok(Variant::Microsoft));
        assert_eq!("Future".parse(), Ok(Variant::Future));
        assert_eq!(
            "RFC9562".parse::<Variant>(),
            Err(Error::InvalidVariant("RFC9562".to_owned()))
        );
        assert_eq!(Variant::from_name_lossy("bogus"), Variant::Rfc4122);
        assert_eq!(Variant::from_name_lossy("future"), Variant::Future);
    }

    /// Reports version nibble as-is
    #[test]
    fn reports_version_nibble_as_is() {
        let e: Uuid = "c232ab00-9414-11ec-b3c4-9a448486c3c8".parse().unwrap();
        assert_eq!(e.version(), 1);
        let e: Uuid = "017f22e2-79b0-7cc3-98c4-dc0c0c07398f".parse().unwrap();
        assert_eq!(e.version(), 7);
    }
}
