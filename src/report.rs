//! Human-readable report of decoded UUIDv1 fields

use std::fmt;

use crate::v1::Fields;

/// The width of the `Field` column.
const COLUMN_WIDTH: usize = 28;

/// A two-column `Field`/`Value` table describing a decoded UUID.
///
/// The `Version` row comes last, after the clock sequence.
///
/// # Examples
///
/// ```rust
/// let fields = uuidv1::v1::decode("c232ab00-9414-11ec-b3c4-9a448486c3c8")?;
/// let report = uuidv1::Report::new(&fields).to_string();
/// assert!(report.starts_with("Field                       Value\n"));
/// assert!(report.contains("\nClock Sequence              13252\n"));
/// # Ok::<(), uuidv1::Error>(())
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Report<'a> {
    fields: &'a Fields,
}

impl<'a> Report<'a> {
    /// Creates a report of `fields`.
    pub const fn new(fields: &'a Fields) -> Self {
        Self { fields }
    }

    fn rows(&self) -> [(&'static str, String); 10] {
        let f = self.fields;
        [
            ("Variant", f.variant.to_string()),
            ("time_low", format!("{:08x}", f.time_low)),
            ("time_mid", format!("{:04x}", f.time_mid)),
            ("time_hi_and_version", format!("{:04x}", f.time_hi_and_version)),
            (
                "clock_seq_hi_and_reserved",
                format!("{:02x}", f.clock_seq_hi_and_reserved),
            ),
            ("clock_seq_low", format!("{:02x}", f.clock_seq_low)),
            ("node", format!("{} ({})", f.node, f.node.mac())),
            ("Timestamp", f.timestamp.to_string()),
            ("Clock Sequence", f.clock_sequence.to_string()),
            ("Version", f.version.to_string()),
        ]
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<w$}{}", "Field", "Value", w = COLUMN_WIDTH)?;
        writeln!(f, "{:<w$}{}", "-----", "-----", w = COLUMN_WIDTH)?;
        for (name, value) in self.rows() {
            writeln!(f, "{:<w$}{}", name, value, w = COLUMN_WIDTH)?;
        }
        Ok(())
    }
}
