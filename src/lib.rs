//! Decoding, encoding, and enumeration of RFC 4122 version 1 (time-based) UUIDs
//!
//! ```rust
//! use uuidv1::{v1, Variant};
//!
//! let fields = v1::decode("c232ab00-9414-11ec-b3c4-9a448486c3c8")?;
//! println!("{}", uuidv1::Report::new(&fields));
//!
//! let uuid = v1::encode(0x1ec9414c232ab00, 0x33c4, "9a448486c3c8", Variant::Rfc4122)?;
//! assert_eq!(uuid.as_str(), "c232ab00-9414-11ec-b3c4-9a448486c3c8");
//! # Ok::<(), uuidv1::Error>(())
//! ```
//!
//! See [RFC 4122](https://www.rfc-editor.org/rfc/rfc4122#section-4.1.2).
//!
//! # Field and bit layout
//!
//! A version 1 UUID has the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          time_low                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |       time_mid                |  ver  |       time_high       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|         clock_seq         |             node              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                              node                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 60-bit timestamp, split into `time_low`, `time_mid`, and `time_high`, counts
//!   100-nanosecond intervals since 1582-10-15T00:00:00Z. It is stored least significant part
//!   first, so the canonical string does not sort by time.
//! - The 4-bit `ver` field is set at `0001`.
//! - The `var` field is `10` for RFC 4122 UUIDs. The NCS variant uses a single `0` bit, while the
//!   Microsoft and Future variants take three bits (`110` and `111`), overlapping the most
//!   significant bit of the 14-bit `clock_seq`.
//! - The 48-bit `node` field conventionally holds a MAC address.
//!
//! # Enumeration
//!
//! [`sandwich`] walks every timestamp between two UUIDs that share a clock sequence and node, and
//! [`generate`] walks the cartesian product of timestamp, clock sequence, and node value sets.
//! Both return lazy iterators, so even ranges spanning billions of ticks use constant memory.
//!
//! ```rust
//! let n = uuidv1::sandwich(
//!     "c232ab00-9414-11ec-b3c4-9a448486c3c8",
//!     "c232ab09-9414-11ec-b3c4-9a448486c3c8",
//! )?
//! .count();
//! assert_eq!(n, 10);
//! # Ok::<(), uuidv1::Error>(())
//! ```

mod error;
pub use error::{Error, Result};

mod id;
pub use id::{Uuid, Variant};

pub mod v1;
#[doc(inline)]
pub use v1::{Fields, Node, Timestamp};

pub mod sandwich;
#[doc(inline)]
pub use sandwich::{sandwich, Sandwich};

pub mod generate;
#[doc(inline)]
pub use generate::{generate, Generate, ValueSet};

mod report;
pub use report::Report;

pub mod sink;
