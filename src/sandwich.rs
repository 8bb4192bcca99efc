//! Enumeration of every UUID between two UUIDv1 bounds
//!
//! A *sandwich* holds the clock sequence and node of the lower bound fixed and walks the timestamp
//! from the lower bound to the upper bound, one tick at a time, both ends inclusive.

use std::{iter::FusedIterator, ops::RangeInclusive};

use crate::{v1::Node, Result, Uuid, Variant};

/// An iterator over the UUIDs of a sandwich, in ascending timestamp order.
///
/// The iterator is lazy and never holds more than one UUID. Clone it, or call [`sandwich`] again,
/// to walk the same range a second time.
///
/// # Examples
///
/// ```rust
/// let mut it = uuidv1::sandwich(
///     "c232ab00-9414-11ec-b3c4-9a448486c3c8",
///     "c232ab02-9414-11ec-0000-000000000000",
/// )?;
/// assert_eq!(it.count_u64(), 3);
/// assert_eq!(
///     it.next().map(|e| e.to_string()).as_deref(),
///     Some("c232ab00-9414-11ec-b3c4-9a448486c3c8")
/// );
/// # Ok::<(), uuidv1::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Sandwich {
    timestamps: RangeInclusive<u64>,
    clock_seq: u16,
    node: Node,
}

impl Sandwich {
    /// Creates an iterator from decoded bounds.
    ///
    /// The clock sequence and node come from `lower`; only the timestamp of `upper` is used.
    pub fn new(lower: Uuid, upper: Uuid) -> Self {
        Self {
            timestamps: lower.timestamp().ticks()..=upper.timestamp().ticks(),
            clock_seq: lower.clock_sequence(),
            node: lower.node(),
        }
    }

    /// Returns a copy of this iterator that produces UUIDs for another node.
    pub fn with_node(&self, node: Node) -> Self {
        Self {
            node,
            ..self.clone()
        }
    }

    /// Returns the number of UUIDs left, which may exceed `usize` on narrow targets.
    pub fn count_u64(&self) -> u64 {
        if self.timestamps.is_empty() {
            0
        } else {
            self.timestamps.end() - self.timestamps.start() + 1
        }
    }
}

impl Iterator for Sandwich {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        self.timestamps.next().map(|timestamp| {
            Uuid::from_fields_v1(
                timestamp,
                self.clock_seq,
                self.node.as_bytes(),
                Variant::Rfc4122,
            )
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.count_u64()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Sandwich {}

/// Parses two UUID strings and returns an iterator over every UUID between them.
///
/// The iterator is empty if the timestamp of `uuid1` is greater than that of `uuid2`; the bounds
/// are never swapped.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`](crate::Error::InvalidLength) or
/// [`Error::InvalidFormat`](crate::Error::InvalidFormat) if either bound is not a UUID.
pub fn sandwich(uuid1: &str, uuid2: &str) -> Result<Sandwich> {
    Ok(Sandwich::new(uuid1.parse()?, uuid2.parse()?))
}

/// Parses a comma-separated list of machine identifiers into nodes.
///
/// # Errors
///
/// Returns [`Error::InvalidNode`](crate::Error::InvalidNode) for the first identifier that is not
/// 12 hexadecimal digits.
pub fn parse_machines(machines: &str) -> Result<Vec<Node>> {
    machines.split(',').map(str::parse).collect()
}

/// Expands a sandwich into one independent sandwich per machine, each with the node field of both
/// bounds replaced by that machine's identifier.
pub fn per_machine<'a>(
    base: &'a Sandwich,
    machines: &'a [Node],
) -> impl Iterator<Item = (Node, Sandwich)> + 'a {
    machines.iter().map(move |&node| (node, base.with_node(node)))
}
