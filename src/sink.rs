//! Line-oriented output of generated UUIDs

use std::{
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{v1::Node, Result, Uuid};

/// Writes one canonical UUID per line to `out` and returns the number of lines written.
///
/// The output is buffered internally and flushed before returning, whether or not writing
/// succeeded.
pub fn write_lines<I, W>(uuids: I, out: W) -> io::Result<u64>
where
    I: IntoIterator<Item = Uuid>,
    W: Write,
{
    let mut buf = io::BufWriter::new(out);
    let written = uuids.into_iter().try_fold(0u64, |n, e| {
        buf.write_all(e.encode().as_bytes())?;
        buf.write_all(b"\n")?;
        Ok::<_, io::Error>(n + 1)
    });
    let flushed = buf.flush();
    let n = written?;
    flushed?;
    Ok(n)
}

/// Creates or truncates the file at `path` and writes one canonical UUID per line to it.
pub fn write_file<I>(path: &Path, uuids: I) -> Result<u64>
where
    I: IntoIterator<Item = Uuid>,
{
    let file = fs::File::create(path)?;
    let n = write_lines(uuids, file)?;
    tracing::info!(path = %path.display(), count = n, "wrote UUIDs");
    Ok(n)
}

/// Returns the output path for one machine: the file name of `output` prefixed with the machine's
/// node and a hyphen, in the same directory.
pub fn machine_path(output: &Path, machine: &Node) -> PathBuf {
    let mut name = OsString::from(format!("{}-", machine));
    name.push(output.file_name().unwrap_or_default());
    output.with_file_name(name)
}
