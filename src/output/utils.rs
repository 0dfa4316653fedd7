//! Shared cell formatting helpers

use chrono::{DateTime, Utc};

use crate::listing::EntryKind;

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

/// Render permission bits `ls -l` style, e.g. `drwxr-xr-x`.
///
/// Unknown modes render as `-`.
pub fn format_mode(kind: EntryKind, mode: Option<u32>) -> String {
    let Some(mode) = mode else {
        return "-".to_string();
    };

    let type_char = match kind {
        EntryKind::Directory | EntryKind::HamtShard => 'd',
        EntryKind::Symlink => 'l',
        EntryKind::File | EntryKind::Unknown => '-',
    };

    let mut out = String::with_capacity(10);
    out.push(type_char);
    for (shift, special, special_char) in [(6, 0o4000, 's'), (3, 0o2000, 's'), (0, 0o1000, 't')] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        let exec = bits & 0o1 != 0;
        out.push(match (mode & special != 0, exec) {
            (true, true) => special_char,
            (true, false) => special_char.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}

/// Octal permission string for structured output, e.g. `0755`.
pub fn format_mode_octal(mode: u32) -> String {
    format!("{:04o}", mode & 0o7777)
}

/// Render a modification time as `YYYY-MM-DD HH:MM` (UTC), unknown as `-`.
pub fn format_mtime(mtime: Option<DateTime<Utc>>) -> String {
    match mtime {
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(1023), "1023B");
        assert_eq!(format_size(1536), "1.5K");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0M");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn test_format_mode() {
        assert_eq!(format_mode(EntryKind::Directory, Some(0o755)), "drwxr-xr-x");
        assert_eq!(format_mode(EntryKind::File, Some(0o644)), "-rw-r--r--");
        assert_eq!(format_mode(EntryKind::Symlink, Some(0o777)), "lrwxrwxrwx");
        assert_eq!(format_mode(EntryKind::File, None), "-");
    }

    #[test]
    fn test_format_mode_special_bits() {
        assert_eq!(format_mode(EntryKind::File, Some(0o4755)), "-rwsr-xr-x");
        assert_eq!(format_mode(EntryKind::Directory, Some(0o1777)), "drwxrwxrwt");
        assert_eq!(format_mode(EntryKind::File, Some(0o2644)), "-rw-r-Sr--");
    }

    #[test]
    fn test_format_mode_octal() {
        assert_eq!(format_mode_octal(0o755), "0755");
        assert_eq!(format_mode_octal(0o100644), "0644");
    }

    #[test]
    fn test_format_mtime() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap();
        assert_eq!(format_mtime(Some(t)), "2024-03-09 14:05");
        assert_eq!(format_mtime(None), "-");
    }
}
