use std::{fmt, time::Duration};

use crate::{error::ConvertError, Subtitle};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse a complete SRT document.
///
/// Any malformed index or timestamp header fails the whole document, since
/// block boundaries can not be trusted past that point.
pub fn parse_document(document: &str) -> Result<Vec<Subtitle>, ConvertError> {
    let document = document.trim_start_matches(BYTE_ORDER_MARK);
    if document.trim().is_empty() {
        return Ok(Vec::new());
    }

    // subrip only accepts text lines that carry a line ending
    let parsed = if document.ends_with('\n') {
        subrip::parse(document)
    } else {
        subrip::parse(&format!("{}\n", document))
    }
    .map_err(|e| ConvertError::Format(format!("{:?}", e)))?;

    let mut subs = Vec::with_capacity(parsed.len());
    for sub in parsed {
        split_empty_payloads(sub, &mut subs);
    }
    for sub in subs.iter_mut() {
        let trimmed = sub.text.trim_end_matches(['\r', '\n']).len();
        sub.text.truncate(trimmed);
    }
    Ok(subs)
}

/// subrip skips the blank lines after a timestamp, so a subtitle with no
/// payload absorbs the header and text of the one after it. Split those back
/// out, leaving the empty subtitle with empty text.
fn split_empty_payloads(sub: Subtitle, out: &mut Vec<Subtitle>) {
    let mut current = sub;
    while let Some(next) = embedded_subtitle(&current.text) {
        out.push(Subtitle {
            text: String::new(),
            ..current
        });
        current = next;
    }
    out.push(current);
}

fn embedded_subtitle(text: &str) -> Option<Subtitle> {
    let re = once_cell_regex::regex!(
        r##"^(?P<idx>\d+)[ \t]*\r?\n(?P<start>\d+:\d{2}:\d{2}[,.]\d{3})[ \t]*-->[ \t]*(?P<end>\d+:\d{2}:\d{2}[,.]\d{3})[^\n]*(\n|$)"##
    );
    let captures = re.captures(text)?;
    let group = |name: &str| {
        captures
            .name(name)
            .expect("non optional regex match")
            .as_str()
    };
    let rest = &text[captures.get(0).expect("non optional regex match").end()..];

    Some(Subtitle {
        idx: group("idx").parse().ok()?,
        start: parse_timestamp(group("start"))?,
        end: parse_timestamp(group("end"))?,
        text: rest.to_string(),
    })
}

/// `HH:MM:SS,mmm` (or with a `.` before the millis)
fn parse_timestamp(s: &str) -> Option<Duration> {
    let (hms, millis) = s.split_once([',', '.'])?;
    let mut parts = hms.splitn(3, ':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    let millis: u64 = millis.parse().ok()?;
    Some(Duration::from_millis(
        ((hours * 60 + minutes) * 60 + seconds) * 1_000 + millis,
    ))
}

/// SRT timestamp, `HH:MM:SS,mmm`.
pub struct Timestamp(pub Duration);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            millis / 3_600_000,
            (millis / 60_000) % 60,
            (millis / 1_000) % 60,
            millis % 1_000
        )
    }
}

/// Renders subtitles as an SRT document, keeping each subtitle's own index.
pub struct SrtDocument<'a>(pub &'a [Subtitle]);

impl<'a> fmt::Display for SrtDocument<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sub in self.0 {
            write!(
                f,
                "{}\n{} --> {}\n{}\n\n",
                sub.idx,
                Timestamp(sub.start),
                Timestamp(sub.end),
                sub.text
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FLIGHT: &str = include_str!("../test_data/autel_flight.srt");

    fn sub(idx: u32, start_ms: u64, end_ms: u64, text: &str) -> Subtitle {
        Subtitle {
            idx,
            start: Duration::from_millis(start_ms),
            end: Duration::from_millis(end_ms),
            text: text.to_string(),
        }
    }

    #[test]
    fn timestamp_display() {
        assert_eq!(Timestamp(Duration::from_millis(0)).to_string(), "00:00:00,000");
        assert_eq!(
            Timestamp(Duration::from_millis(3_723_045)).to_string(),
            "01:02:03,045"
        );
        assert_eq!(
            Timestamp(Duration::from_secs(100 * 3600)).to_string(),
            "100:00:00,000"
        );
    }

    #[test]
    fn document_keeps_index_gaps() {
        let subs = vec![sub(1, 0, 33, "first"), sub(4, 100, 133, "fourth")];
        assert_eq!(
            SrtDocument(&subs).to_string(),
            "1\n00:00:00,000 --> 00:00:00,033\nfirst\n\n4\n00:00:00,100 --> 00:00:00,133\nfourth\n\n"
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(SrtDocument(&[]).to_string(), "");
    }

    #[test]
    fn parse_fixture() {
        let subs = parse_document(FLIGHT).unwrap();
        assert_eq!(subs.len(), 5);
        let idx: Vec<u32> = subs.iter().map(|s| s.idx).collect();
        assert_eq!(idx, vec![1, 2, 3, 4, 5]);
        assert_eq!(subs[0].start, Duration::from_millis(0));
        assert_eq!(subs[0].end, Duration::from_millis(33));
        assert_eq!(subs[4].start, Duration::from_millis(1_001));
        assert_eq!(subs[4].end, Duration::from_millis(1_034));
    }

    #[test]
    fn parse_ignores_byte_order_mark() {
        let with_bom = format!("{}{}", BYTE_ORDER_MARK, FLIGHT);
        assert_eq!(parse_document(&with_bom).unwrap().len(), 5);
    }

    #[test]
    fn parse_strips_trailing_line_endings() {
        let subs = parse_document(FLIGHT).unwrap();
        assert_eq!(subs[1].text, "Recording started");
    }

    #[test]
    fn parse_without_trailing_newline() {
        let doc = "1\n00:00:00,000 --> 00:00:00,033\nGPS(E: 120.3534, N: 23.1201, 26.0m) ISO:100 SHUTTER:1667.11 EV:0.0 F-NUM:2.8";
        let subs = parse_document(doc).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(
            subs[0].text,
            "GPS(E: 120.3534, N: 23.1201, 26.0m) ISO:100 SHUTTER:1667.11 EV:0.0 F-NUM:2.8"
        );
    }

    #[test]
    fn parse_empty_document() {
        assert!(parse_document("").unwrap().is_empty());
        assert!(parse_document("\n\n").unwrap().is_empty());
    }

    #[test]
    fn empty_payload_does_not_absorb_next_subtitle() {
        let doc = "1\n00:00:00,000 --> 00:00:00,033\n\n2\n00:00:00,033 --> 00:00:00,066\nGPS(E: 120.3534, N: 23.1201, 26.0m) ISO:100 SHUTTER:1667.11 EV:0.0 F-NUM:2.8\n\n";
        let subs = parse_document(doc).unwrap();
        assert_eq!(
            subs,
            vec![
                sub(1, 0, 33, ""),
                sub(
                    2,
                    33,
                    66,
                    "GPS(E: 120.3534, N: 23.1201, 26.0m) ISO:100 SHUTTER:1667.11 EV:0.0 F-NUM:2.8"
                ),
            ]
        );
    }

    #[test]
    fn split_chained_empty_payloads() {
        let absorbed = sub(
            1,
            0,
            33,
            "2\n00:00:00,033 --> 00:00:00,066\n3\n00:00:00,066 --> 00:00:00,100\nISO:100\n",
        );
        let mut out = Vec::new();
        split_empty_payloads(absorbed, &mut out);
        assert_eq!(
            out,
            vec![
                sub(1, 0, 33, ""),
                sub(2, 33, 66, ""),
                sub(3, 66, 100, "ISO:100\n"),
            ]
        );
    }

    #[test]
    fn payload_without_header_is_kept() {
        let mut out = Vec::new();
        split_empty_payloads(sub(7, 0, 33, "12\nnot a timestamp\n"), &mut out);
        assert_eq!(out, vec![sub(7, 0, 33, "12\nnot a timestamp\n")]);
    }

    #[test]
    fn timestamp_parse() {
        assert_eq!(
            parse_timestamp("01:02:03,045"),
            Some(Duration::from_millis(3_723_045))
        );
        assert_eq!(
            parse_timestamp("00:00:01.001"),
            Some(Duration::from_millis(1_001))
        );
        assert_eq!(parse_timestamp("01:02"), None);
    }

    #[test]
    fn parse_rejects_malformed_header() {
        let doc = "1\nthis is not a timestamp\nhello\n\n";
        assert!(matches!(parse_document(doc), Err(ConvertError::Format(_))));
    }
}
