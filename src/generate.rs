//! Parametric generation of UUIDv1 values
//!
//! Each parameter is a *value set* written as a single value (`"42"`), an inclusive range
//! (`"40-45"`), or a comma-separated list of either (`"1,2,10-12"`). [`generate`] produces the
//! cartesian product of three value sets with the timestamp as the outermost loop and the node as
//! the innermost.

use std::{fmt, iter::FusedIterator, ops::RangeInclusive};

use crate::{
    v1::{Node, MAX_CLOCK_SEQUENCE, MAX_NODE, MAX_TIMESTAMP},
    Error, Result, Uuid, Variant,
};

/// A set of integers given as a list of inclusive ranges, iterated in the order written.
///
/// Ranges whose start exceeds their end contribute no values.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ValueSet {
    segments: Vec<RangeInclusive<u64>>,
}

/// A position in a [`ValueSet`]: the segment index and the value at that index.
type Position = (usize, u64);

impl ValueSet {
    /// Parses decimal values.
    pub fn parse_decimal(input: &str) -> Result<Self> {
        Self::parse(input, 10)
    }

    /// Parses hexadecimal values, each with an optional `0x` prefix.
    pub fn parse_hex(input: &str) -> Result<Self> {
        Self::parse(input, 16)
    }

    fn parse(input: &str, radix: u32) -> Result<Self> {
        let err = |reason: String| Error::InvalidValue {
            input: input.to_owned(),
            reason,
        };
        let number = |text: &str| {
            let text = text.trim();
            let digits = match radix {
                16 => text
                    .strip_prefix("0x")
                    .or_else(|| text.strip_prefix("0X"))
                    .unwrap_or(text),
                _ => text,
            };
            if digits.is_empty() || digits.starts_with('+') {
                return Err(err(format!("expected a number, found '{}'", text)));
            }
            u64::from_str_radix(digits, radix)
                .map_err(|e| err(format!("cannot parse '{}': {}", text, e)))
        };

        let segments = input
            .split(',')
            .map(|item| match item.split_once('-') {
                Some((start, end)) => Ok(number(start)?..=number(end)?),
                None => number(item).map(|n| n..=n),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }

    /// Returns an iterator over the values in the order written.
    pub fn iter(&self) -> impl Iterator<Item = u64> + Clone + '_ {
        self.segments.iter().flat_map(|r| r.clone())
    }

    /// Returns `true` if the set produces no values.
    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }

    /// Returns the largest value in the set.
    pub fn max(&self) -> Option<u64> {
        self.segments
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| *r.end())
            .max()
    }

    fn first(&self) -> Option<Position> {
        self.first_from(0)
    }

    fn first_from(&self, segment: usize) -> Option<Position> {
        self.segments
            .iter()
            .enumerate()
            .skip(segment)
            .find(|(_, r)| !r.is_empty())
            .map(|(i, r)| (i, *r.start()))
    }

    fn after(&self, (segment, value): Position) -> Option<Position> {
        if value < *self.segments[segment].end() {
            Some((segment, value + 1))
        } else {
            self.first_from(segment + 1)
        }
    }
}

impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if r.start() == r.end() {
                write!(f, "{}", r.start())?;
            } else {
                write!(f, "{}-{}", r.start(), r.end())?;
            }
        }
        Ok(())
    }
}

/// An iterator over the cartesian product of timestamps, clock sequences, and nodes.
///
/// # Examples
///
/// ```rust
/// use uuidv1::Variant;
///
/// let got: Vec<String> = uuidv1::generate("0-1", "5", "1", Variant::Rfc4122)?
///     .map(String::from)
///     .collect();
/// assert_eq!(
///     got,
///     [
///         "00000000-0000-1000-8005-000000000001",
///         "00000001-0000-1000-8005-000000000001",
///     ]
/// );
/// # Ok::<(), uuidv1::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Generate {
    timestamps: ValueSet,
    clock_seqs: ValueSet,
    nodes: ValueSet,
    variant: Variant,

    /// The positions of the next UUID in each set, or `None` once exhausted.
    next: Option<[Position; 3]>,
}

impl Generate {
    /// Creates a generator over parsed value sets.
    ///
    /// Timestamps wider than 60 bits and clock sequences wider than 14 bits are masked when
    /// encoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNode`] if any node does not fit in 48 bits.
    pub fn new(
        timestamps: ValueSet,
        clock_seqs: ValueSet,
        nodes: ValueSet,
        variant: Variant,
    ) -> Result<Self> {
        if let Some(max) = nodes.max().filter(|&n| n > MAX_NODE) {
            return Err(Error::InvalidNode(format!("{:x}", max)));
        }
        if timestamps.max().is_some_and(|t| t > MAX_TIMESTAMP) {
            tracing::warn!(%timestamps, "timestamps wider than 60 bits will be truncated");
        }
        if clock_seqs.max().is_some_and(|c| c > MAX_CLOCK_SEQUENCE as u64) {
            tracing::warn!(%clock_seqs, "clock sequences wider than 14 bits will be truncated");
        }

        let next = match (timestamps.first(), clock_seqs.first(), nodes.first()) {
            (Some(t), Some(c), Some(n)) => Some([t, c, n]),
            _ => None,
        };
        Ok(Self {
            timestamps,
            clock_seqs,
            nodes,
            variant,
            next,
        })
    }

    fn advance(&self, [t, c, n]: [Position; 3]) -> Option<[Position; 3]> {
        if let Some(n) = self.nodes.after(n) {
            Some([t, c, n])
        } else if let Some(c) = self.clock_seqs.after(c) {
            Some([t, c, self.nodes.first()?])
        } else {
            let t = self.timestamps.after(t)?;
            Some([t, self.clock_seqs.first()?, self.nodes.first()?])
        }
    }
}

impl Iterator for Generate {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.advance(current);

        let [(_, t), (_, c), (_, n)] = current;
        Some(Uuid::from_fields_v1(
            t,
            (c & MAX_CLOCK_SEQUENCE as u64) as u16,
            Node::from_u64_truncated(n).as_bytes(),
            self.variant,
        ))
    }
}

impl FusedIterator for Generate {}

/// Parses the three parameter strings and returns an iterator over every combination.
///
/// Timestamps and clock sequences are decimal; nodes are hexadecimal. All parameters are parsed
/// and validated before the first UUID is produced.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] if any parameter is malformed, or [`Error::InvalidNode`] if any
/// node does not fit in 48 bits.
pub fn generate(
    timestamps: &str,
    clock_seqs: &str,
    nodes: &str,
    variant: Variant,
) -> Result<Generate> {
    Generate::new(
        ValueSet::parse_decimal(timestamps)?,
        ValueSet::parse_decimal(clock_seqs)?,
        ValueSet::parse_hex(nodes)?,
        variant,
    )
}

#[cfg(test)]
mod tests {
    use super::{generate, Generate, ValueSet};
    use crate::{v1, Error, Uuid, Variant};

    /// Parses single values, ranges, and lists
    #[test]
    fn parses_single_values_ranges_and_lists() {
        let cases: [(&str, &[u64]); 7] = [
            ("7", &[7]),
            ("3-6", &[3, 4, 5, 6]),
            ("5-5", &[5]),
            ("6-3", &[]),
            ("1,3,2", &[1, 3, 2]),
            ("1-3,7,9-10", &[1, 2, 3, 7, 9, 10]),
            (" 4 , 5 - 6 ", &[4, 5, 6]),
        ];

        for (input, expected) in cases {
            let e = ValueSet::parse_decimal(input).unwrap();
            assert_eq!(e.iter().collect::<Vec<_>>(), expected, "{}", input);
            assert_eq!(e.is_empty(), expected.is_empty());
            assert_eq!(e.max(), expected.iter().copied().max());
        }
    }

    /// Parses hexadecimal node values
    #[test]
    fn parses_hexadecimal_node_values() {
        let e = ValueSet::parse_hex("a-c,0xFF,ffffffffffff").unwrap();
        assert_eq!(
            e.iter().collect::<Vec<_>>(),
            [0xa, 0xb, 0xc, 0xff, 0xffff_ffff_ffff]
        );
    }

    /// Rejects malformed value syntax
    #[test]
    fn rejects_malformed_value_syntax() {
        for input in ["", "a", "1-", "-1", "1-2-3", "1,,2", "+1", "0x10", "1.5"] {
            assert!(
                matches!(
                    ValueSet::parse_decimal(input),
                    Err(Error::InvalidValue { input: ref i, .. }) if i == input
                ),
                "{}",
                input
            );
        }
        assert!(ValueSet::parse_hex("0xg").is_err());
    }

    /// Formats value sets in parseable form
    #[test]
    fn formats_value_sets_in_parseable_form() {
        let e = ValueSet::parse_decimal("1-3, 7,9-10").unwrap();
        assert_eq!(e.to_string(), "1-3,7,9-10");
        assert_eq!(ValueSet::parse_decimal(&e.to_string()), Ok(e));
    }

    /// Generates two UUIDs differing only in time_low
    #[test]
    fn generates_two_uuids_differing_only_in_time_low() {
        let got: Vec<Uuid> = generate("0,1", "5", "000000000001", Variant::Rfc4122)
            .unwrap()
            .collect();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].time_low(), 0);
        assert_eq!(got[1].time_low(), 1);
        assert_eq!(got[0].as_bytes()[4..], got[1].as_bytes()[4..]);
        assert_eq!(got[0].clock_sequence(), 5);
    }

    /// Iterates timestamp outer, clock sequence middle, node inner
    #[test]
    fn iterates_timestamp_outer_clock_sequence_middle_node_inner() {
        let got: Vec<(u64, u16, String)> = generate("10-11", "1,2", "a-c", Variant::Rfc4122)
            .unwrap()
            .map(|e| {
                let f = v1::Fields::from(e);
                (f.timestamp.ticks(), f.clock_sequence, f.node.to_string())
            })
            .collect();

        let mut expected = Vec::new();
        for t in 10..=11 {
            for c in [1, 2] {
                for n in ["00000000000a", "00000000000b", "00000000000c"] {
                    expected.push((t, c, n.to_owned()));
                }
            }
        }
        assert_eq!(got, expected);
    }

    /// Skips empty segments and yields nothing for empty sets
    #[test]
    fn skips_empty_segments_and_yields_nothing_for_empty_sets() {
        let got: Vec<u64> = generate("5-3,8,9-7,10", "0", "0", Variant::Ncs)
            .unwrap()
            .map(|e| e.timestamp().ticks())
            .collect();
        assert_eq!(got, [8, 10]);

        assert_eq!(generate("1", "3-2", "0", Variant::Ncs).unwrap().count(), 0);
        assert_eq!(generate("2-1", "0", "0", Variant::Ncs).unwrap().count(), 0);
    }

    /// Stamps the requested variant
    #[test]
    fn stamps_the_requested_variant() {
        for v in [
            Variant::Ncs,
            Variant::Rfc4122,
            Variant::Microsoft,
            Variant::Future,
        ] {
            assert!(generate("0-3", "0-3", "0-3", v)
                .unwrap()
                .all(|e| e.variant() == v && e.version() == 1));
        }
    }

    /// Masks wide clock sequences and rejects wide nodes
    #[test]
    fn masks_wide_clock_sequences_and_rejects_wide_nodes() {
        let got: Vec<u16> = generate("0", "16385", "0", Variant::Rfc4122)
            .unwrap()
            .map(|e| e.clock_sequence())
            .collect();
        assert_eq!(got, [1]);

        assert_eq!(
            generate("0", "0", "1000000000000", Variant::Rfc4122).unwrap_err(),
            Error::InvalidNode("1000000000000".to_owned())
        );
    }

    /// Generates canonical strings
    #[test]
    fn generates_canonical_strings() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-1[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        for _ in 0..100 {
            let t = rand::random::<u64>() >> 4;
            let c = rand::random::<u16>() >> 2;
            let n = rand::random::<u64>() >> 16;
            let ts = format!("{}-{}", t, t + 9);
            let cs = format!("{},{}", c, c ^ 1);
            let ns = format!("{:x}", n);
            for e in generate(&ts, &cs, &ns, Variant::Rfc4122).unwrap() {
                assert!(re.is_match(&e.to_string()));
            }
        }
    }

    /// Restarts by cloning
    #[test]
    fn restarts_by_cloning() {
        let g: Generate = generate("0-2", "0-1", "1-2", Variant::Rfc4122).unwrap();
        let first: Vec<Uuid> = g.clone().collect();
        assert_eq!(first.len(), 12);
        assert_eq!(g.collect::<Vec<_>>(), first);
    }

    /// Stays lazy over huge ranges
    #[test]
    fn stays_lazy_over_huge_ranges() {
        let timestamps = "0-1152921504606846975";
        let mut g = generate(timestamps, "0-16383", "0-ffffffffffff", Variant::Rfc4122).unwrap();
        assert_eq!(
            g.next().map(String::from).as_deref(),
            Some("00000000-0000-1000-8000-000000000000")
        );
        assert_eq!(
            g.nth(1).map(String::from).as_deref(),
            Some("00000000-0000-1000-8000-000000000002")
        );
    }
}
