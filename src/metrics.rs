//! Per-file metrics: line count, size and modification time

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use chrono::{DateTime, Local, Utc};

/// Which metrics to read for each file, and to sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricFlags {
    pub lines: bool,
    pub size: bool,
    pub mtime: bool,
}

impl MetricFlags {
    pub fn all() -> Self {
        Self {
            lines: true,
            size: true,
            mtime: true,
        }
    }

    pub fn any(&self) -> bool {
        self.lines || self.size || self.mtime
    }
}

/// Count lines using buffered byte scanning.
///
/// A final line without a trailing newline still counts.
pub fn count_lines(path: &Path) -> io::Result<u64> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = [0u8; 8192];
    let mut newlines = 0u64;
    let mut last = None;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        newlines += buf[..n].iter().filter(|&&b| b == b'\n').count() as u64;
        last = Some(buf[n - 1]);
    }

    Ok(match last {
        None | Some(b'\n') => newlines,
        Some(_) => newlines + 1,
    })
}

/// Size in bytes and modification time, from one metadata call.
pub fn size_and_mtime(path: &Path) -> io::Result<(u64, DateTime<Utc>)> {
    let meta = path.metadata()?;
    let modified = meta.modified()?;
    Ok((meta.len(), DateTime::<Utc>::from(modified)))
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Format a timestamp in local time, minute precision.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
