//! UUIDv1 field codec
//!
//! [`decode`] splits a UUID into its RFC 4122 version 1 fields and [`encode`] packs raw field
//! values back into the canonical string form.
//!
//! # Variant packing
//!
//! The clock sequence is 14 bits wide, but the Microsoft and Future variants claim the top three
//! bits of `clock_seq_hi_and_reserved`, one more than the two bits left over. When packing, the
//! variant pattern wins: exactly the bits the variant claims are overwritten and every other bit
//! carries the clock sequence. As a result, encoding is lossless for the NCS and RFC4122 variants,
//! while the Microsoft and Future variants pin bit 13 of the clock sequence to 0 and 1
//! respectively.
//!
//! ```rust
//! use uuidv1::{v1, Variant};
//!
//! let fields = v1::decode("c232ab00-9414-11ec-b3c4-9a448486c3c8")?;
//! assert_eq!(fields.timestamp.ticks(), 0x1ec9414c232ab00);
//! assert_eq!(fields.clock_sequence, 0x33c4);
//! assert_eq!(fields.node.to_string(), "9a448486c3c8");
//! assert_eq!(fields.variant, Variant::Rfc4122);
//!
//! let text = v1::encode(0x1ec9414c232ab00, 0x33c4, "9a448486c3c8", Variant::Rfc4122)?;
//! assert_eq!(text.as_str(), "c232ab00-9414-11ec-b3c4-9a448486c3c8");
//! # Ok::<(), uuidv1::Error>(())
//! ```

use std::{fmt, str};

use chrono::{DateTime, Utc};
use fstr::FStr;

use crate::{Error, Result, Uuid, Variant};

/// The number of 100-nanosecond ticks between the Gregorian reform (1582-10-15T00:00:00Z) and the
/// Unix epoch.
pub const GREGORIAN_TO_UNIX_TICKS: u64 = 0x01b2_1dd2_1381_4000;

/// The number of 100-nanosecond ticks in one second.
const TICKS_PER_SECOND: i128 = 10_000_000;

/// The largest value the 60-bit timestamp field holds.
pub const MAX_TIMESTAMP: u64 = (1 << 60) - 1;

/// The largest value the 14-bit clock sequence field holds.
pub const MAX_CLOCK_SEQUENCE: u16 = (1 << 14) - 1;

/// The largest value the 48-bit node field holds.
pub const MAX_NODE: u64 = (1 << 48) - 1;

impl Uuid {
    /// Creates a version 1 UUID from raw field values.
    ///
    /// Bits of `timestamp` beyond 60 and of `clock_seq` beyond 14 are discarded. The variant bits
    /// are stamped as described in the [module documentation](crate::v1#variant-packing).
    pub const fn from_fields_v1(
        timestamp: u64,
        clock_seq: u16,
        node: &[u8; 6],
        variant: Variant,
    ) -> Self {
        Self::from_fields_v1_with_version(timestamp, clock_seq, node, variant, 1)
    }

    /// Creates a UUID with the version 1 field layout but an arbitrary 4-bit `version`.
    pub const fn from_fields_v1_with_version(
        timestamp: u64,
        clock_seq: u16,
        node: &[u8; 6],
        variant: Variant,
        version: u8,
    ) -> Self {
        let time_low = timestamp as u32;
        let time_mid = (timestamp >> 32) as u16;
        let time_hi = (timestamp >> 48) as u16 & 0x0fff;
        let time_hi_and_version = ((version as u16 & 0xf) << 12) | time_hi;
        let cs = clock_seq & MAX_CLOCK_SEQUENCE;

        Self::from_bytes([
            (time_low >> 24) as u8,
            (time_low >> 16) as u8,
            (time_low >> 8) as u8,
            time_low as u8,
            (time_mid >> 8) as u8,
            time_mid as u8,
            (time_hi_and_version >> 8) as u8,
            time_hi_and_version as u8,
            variant.stamp((cs >> 8) as u8 & 0x3f),
            cs as u8,
            node[0],
            node[1],
            node[2],
            node[3],
            node[4],
            node[5],
        ])
    }

    /// Returns the `time_low` field.
    pub fn time_low(&self) -> u32 {
        let b = self.as_bytes();
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Returns the `time_mid` field.
    pub fn time_mid(&self) -> u16 {
        let b = self.as_bytes();
        u16::from_be_bytes([b[4], b[5]])
    }

    /// Returns the `time_hi_and_version` field.
    pub fn time_hi_and_version(&self) -> u16 {
        let b = self.as_bytes();
        u16::from_be_bytes([b[6], b[7]])
    }

    /// Returns the `clock_seq_hi_and_reserved` field.
    pub fn clock_seq_hi_and_reserved(&self) -> u8 {
        self.as_bytes()[8]
    }

    /// Returns the `clock_seq_low` field.
    pub fn clock_seq_low(&self) -> u8 {
        self.as_bytes()[9]
    }

    /// Returns the 60-bit timestamp assembled from the three time fields.
    pub fn timestamp(&self) -> Timestamp {
        let hi = (self.time_hi_and_version() & 0x0fff) as u64;
        Timestamp(hi << 48 | (self.time_mid() as u64) << 32 | self.time_low() as u64)
    }

    /// Returns the 14-bit clock sequence.
    pub fn clock_sequence(&self) -> u16 {
        let b = self.as_bytes();
        u16::from_be_bytes([b[8], b[9]]) & MAX_CLOCK_SEQUENCE
    }

    /// Returns the 48-bit node.
    pub fn node(&self) -> Node {
        let mut node = [0u8; 6];
        node.copy_from_slice(&self.as_bytes()[10..]);
        Node(node)
    }

    /// Returns a copy of this UUID with the node field replaced.
    pub fn with_node(&self, node: Node) -> Self {
        let mut bytes = *self.as_bytes();
        bytes[10..].copy_from_slice(&node.0);
        Self::from(bytes)
    }
}

/// The fields of a UUID read with the version 1 layout.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Fields {
    /// The low 32 bits of the timestamp.
    pub time_low: u32,
    /// The middle 16 bits of the timestamp.
    pub time_mid: u16,
    /// The 4-bit version followed by the high 12 bits of the timestamp.
    pub time_hi_and_version: u16,
    /// The variant bits followed by the high bits of the clock sequence.
    pub clock_seq_hi_and_reserved: u8,
    /// The low 8 bits of the clock sequence.
    pub clock_seq_low: u8,
    /// The 48-bit node.
    pub node: Node,
    /// The variant derived from `clock_seq_hi_and_reserved`.
    pub variant: Variant,
    /// The version nibble of `time_hi_and_version`.
    pub version: u8,
    /// The 60-bit timestamp.
    pub timestamp: Timestamp,
    /// The 14-bit clock sequence.
    pub clock_sequence: u16,
}

impl From<Uuid> for Fields {
    fn from(src: Uuid) -> Self {
        Self {
            time_low: src.time_low(),
            time_mid: src.time_mid(),
            time_hi_and_version: src.time_hi_and_version(),
            clock_seq_hi_and_reserved: src.clock_seq_hi_and_reserved(),
            clock_seq_low: src.clock_seq_low(),
            node: src.node(),
            variant: src.variant(),
            version: src.version(),
            timestamp: src.timestamp(),
            clock_sequence: src.clock_sequence(),
        }
    }
}

impl Fields {
    /// Packs the fields back into a version 1 UUID, keeping the decoded variant.
    pub fn to_uuid(&self) -> Uuid {
        Uuid::from_fields_v1(
            self.timestamp.ticks(),
            self.clock_sequence,
            self.node.as_bytes(),
            self.variant,
        )
    }
}

/// Decodes a UUID string into its version 1 fields.
///
/// Hyphens are ignored wherever they appear and hexadecimal digits are accepted in either case.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] if the input does not hold 32 characters besides hyphens, or
/// [`Error::InvalidFormat`] if any of them is not a hexadecimal digit.
pub fn decode(input: &str) -> Result<Fields> {
    input.parse::<Uuid>().map(Fields::from)
}

/// Encodes raw version 1 field values into the 8-4-4-4-12 canonical string.
///
/// # Errors
///
/// Returns [`Error::InvalidNode`] if `node` is not 12 hexadecimal digits.
pub fn encode(timestamp: u64, clock_seq: u16, node: &str, variant: Variant) -> Result<FStr<36>> {
    encode_with_version(timestamp, clock_seq, node, variant, 1)
}

/// Encodes raw field values like [`encode`], but with an arbitrary `version` in place of 1.
///
/// Only the low 4 bits of `version` are kept.
///
/// # Errors
///
/// Returns [`Error::InvalidNode`] if `node` is not 12 hexadecimal digits.
pub fn encode_with_version(
    timestamp: u64,
    clock_seq: u16,
    node: &str,
    variant: Variant,
    version: u8,
) -> Result<FStr<36>> {
    let node = node.parse::<Node>()?;
    let uuid =
        Uuid::from_fields_v1_with_version(timestamp, clock_seq, node.as_bytes(), variant, version);
    Ok(uuid.encode())
}

/// A 60-bit count of 100-nanosecond intervals since 1582-10-15T00:00:00Z.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from a raw tick count, discarding bits beyond 60.
    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks & MAX_TIMESTAMP)
    }

    /// Returns the raw tick count.
    pub const fn ticks(&self) -> u64 {
        self.0
    }

    /// Returns the whole seconds since the Unix epoch, rounded toward negative infinity.
    pub const fn unix_seconds(&self) -> i64 {
        let ticks = self.0 as i128 - GREGORIAN_TO_UNIX_TICKS as i128;
        ticks.div_euclid(TICKS_PER_SECOND) as i64
    }

    /// Converts the timestamp to a UTC date and time truncated to whole seconds.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.unix_seconds(), 0)
    }
}

impl fmt::Display for Timestamp {
    /// Writes the tick count followed by the calendar time, as in
    /// `138648505420000000 (2022-02-22 19:22:22 UTC)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(t) => write!(f, "{} ({})", self.0, t.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "{} (out of range)", self.0),
        }
    }
}

/// A 48-bit node identifier, conventionally a MAC address.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Node([u8; 6]);

impl Node {
    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Creates a node from the low 48 bits of an integer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if `value` does not fit in 48 bits.
    pub fn from_u64(value: u64) -> Result<Self> {
        if value > MAX_NODE {
            return Err(Error::InvalidNode(format!("{:x}", value)));
        }
        Ok(Self::from_u64_truncated(value))
    }

    /// Creates a node from the low 48 bits of an integer, discarding the rest.
    pub const fn from_u64_truncated(value: u64) -> Self {
        let b = value.to_be_bytes();
        Self([b[2], b[3], b[4], b[5], b[6], b[7]])
    }

    /// Returns the colon-separated form, as in `9a:44:84:86:c3:c8`.
    pub fn mac(&self) -> String {
        let b = &self.0;
        format!(
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl From<[u8; 6]> for Node {
    fn from(src: [u8; 6]) -> Self {
        Self(src)
    }
}

impl From<Node> for u64 {
    fn from(src: Node) -> Self {
        let mut bytes = [0u8; 8];
        bytes[2..].copy_from_slice(&src.0);
        Self::from_be_bytes(bytes)
    }
}

impl fmt::Display for Node {
    /// Writes the node as 12 contiguous lowercase hexadecimal digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:012x}", u64::from(*self))
    }
}

impl str::FromStr for Node {
    type Err = Error;

    /// Parses 12 hexadecimal digits, optionally separated by colons or hyphens as in a MAC
    /// address.
    fn from_str(src: &str) -> Result<Self> {
        let err = || Error::InvalidNode(src.to_owned());
        let digits = src
            .chars()
            .filter(|&c| c != ':' && c != '-')
            .map(|c| c.to_digit(16).ok_or_else(err))
            .collect::<Result<Vec<u32>>>()?;
        if digits.len() != 12 {
            return Err(err());
        }

        let mut node = [0u8; 6];
        for (e, pair) in node.iter_mut().zip(digits.chunks_exact(2)) {
            *e = (pair[0] << 4 | pair[1]) as u8;
        }
        Ok(Self(node))
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Fields, Node, Timestamp};
    use serde::{de, ser::SerializeStruct, Deserializer, Serializer};

    impl serde::Serialize for Node {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.to_string())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Node {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(NodeVisitor)
            } else {
                deserializer.deserialize_bytes(NodeVisitor)
            }
        }
    }

    struct NodeVisitor;

    impl<'de> de::Visitor<'de> for NodeVisitor {
        type Value = Node;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a 48-bit node")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 6]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

    /// Serialized as the raw tick count.
    impl serde::Serialize for Timestamp {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_u64(self.ticks())
        }
    }

    impl<'de> serde::Deserialize<'de> for Timestamp {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            <u64 as serde::Deserialize>::deserialize(deserializer).map(Self::from_ticks)
        }
    }

    /// Serialized as a struct carrying every decoded field, in report order.
    impl serde::Serialize for Fields {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("Fields", 10)?;
            state.serialize_field("variant", &self.variant)?;
            state.serialize_field("time_low", &self.time_low)?;
            state.serialize_field("time_mid", &self.time_mid)?;
            state.serialize_field("time_hi_and_version", &self.time_hi_and_version)?;
            state.serialize_field("clock_seq_hi_and_reserved", &self.clock_seq_hi_and_reserved)?;
            state.serialize_field("clock_seq_low", &self.clock_seq_low)?;
            state.serialize_field("node", &self.node)?;
            state.serialize_field("timestamp", &self.timestamp)?;
            state.serialize_field("clock_sequence", &self.clock_sequence)?;
            state.serialize_field("version", &self.version)?;
            state.end()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::{Node, Timestamp};
        use crate::v1::decode;
        use serde_test::{assert_de_tokens_error, assert_ser_tokens, assert_tokens};
        use serde_test::{Configure, Token};

        /// Serializes nodes as hex strings or raw bytes
        #[test]
        fn serializes_nodes_as_hex_strings_or_raw_bytes() {
            let node = "9a448486c3c8".parse::<Node>().unwrap();
            assert_tokens(&node.readable(), &[Token::Str("9a448486c3c8")]);
            assert_tokens(
                &node.compact(),
                &[Token::Bytes(&[0x9a, 0x44, 0x84, 0x86, 0xc3, 0xc8])],
            );
            assert_de_tokens_error::<serde_test::Readable<Node>>(
                &[Token::Str("9a4484")],
                "invalid node '9a4484': expected 12 hexadecimal digits",
            );
        }

        /// Serializes timestamps as tick counts
        #[test]
        fn serializes_timestamps_as_tick_counts() {
            let ts = Timestamp::from_ticks(0x1ec9414c232ab00);
            assert_tokens(&ts, &[Token::U64(0x1ec9414c232ab00)]);
        }

        /// Serializes decoded fields of the reference UUID
        #[test]
        fn serializes_decoded_fields_of_the_reference_uuid() {
            let fields = decode("c232ab00-9414-11ec-b3c4-9a448486c3c8").unwrap();
            assert_ser_tokens(
                &fields.readable(),
                &[
                    Token::Struct {
                        name: "Fields",
                        len: 10,
                    },
                    Token::Str("variant"),
                    Token::Str("RFC4122"),
                    Token::Str("time_low"),
                    Token::U32(0xc232ab00),
                    Token::Str("time_mid"),
                    Token::U16(0x9414),
                    Token::Str("time_hi_and_version"),
                    Token::U16(0x11ec),
                    Token::Str("clock_seq_hi_and_reserved"),
                    Token::U8(0xb3),
                    Token::Str("clock_seq_low"),
                    Token::U8(0xc4),
                    Token::Str("node"),
                    Token::Str("9a448486c3c8"),
                    Token::Str("timestamp"),
                    Token::U64(0x1ec9414c232ab00),
                    Token::Str("clock_sequence"),
                    Token::U16(0x33c4),
                    Token::Str("version"),
                    Token::U8(1),
                    Token::StructEnd,
                ],
            );
        }
    }
}
