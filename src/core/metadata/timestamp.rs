//! Parsing of EXIF-style timestamps.
//!
//! Providers hand back strings like `2020:01:01 10:00:00`, sometimes with
//! fractional seconds or a zone suffix (`2020:01:01 10:00:01+02:00`,
//! `...Z`). A timestamp without a zone is taken as UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Length of `YYYY:MM:DD HH:MM:SS`
const BASE_LEN: usize = 19;

/// Parse an EXIF timestamp, keeping its offset (UTC when none is given).
///
/// Returns `None` for placeholders such as `0000:00:00 00:00:00`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim().trim_matches('"').trim_end_matches('\0').trim();
    if !s.is_ascii() || s.len() < BASE_LEN {
        return None;
    }

    let (base, rest) = s.split_at(BASE_LEN);
    let base: String = base
        .char_indices()
        .map(|(i, c)| match c {
            '-' | '/' if i < 10 => ':',
            'T' if i == 10 => ' ',
            _ => c,
        })
        .collect();

    let naive = NaiveDateTime::parse_from_str(&base, "%Y:%m:%d %H:%M:%S").ok()?;
    let offset = parse_suffix(rest)?;
    naive.and_local_timezone(offset).single()
}

/// Parse a zone offset such as `+02:00`, `-0530` or `+09`
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let s = raw.trim().trim_end_matches('\0');
    if !s.is_ascii() {
        return None;
    }
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let (hours, minutes) = match digits.split_once(':') {
        Some(parts) => parts,
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Combine a zone-less timestamp with a separately recorded offset
pub fn with_offset(raw: &str, offset: &str) -> Option<DateTime<FixedOffset>> {
    let offset = parse_offset(offset)?;
    let parsed = parse_timestamp(raw)?;
    parsed.naive_local().and_local_timezone(offset).single()
}

fn parse_suffix(rest: &str) -> Option<FixedOffset> {
    let rest = match rest.strip_prefix('.') {
        Some(fraction) => fraction.trim_start_matches(|c: char| c.is_ascii_digit()),
        None => rest,
    };

    match rest.trim() {
        "" | "Z" => FixedOffset::east_opt(0),
        zone => parse_offset(zone),
    }
}
