use chrono::NaiveDateTime;
use chrono_tz::Tz;
use mindsync_core::time::format_wall_clock;
use mindsync_core::{local_to_utc, parse_timezone, Event, ScheduleError};
use serde::Serialize;

/// Emit a minimal ICS calendar containing VEVENT blocks.
///
/// Without `tz` the times are floating local times; with `tz` they are
/// converted to UTC.
pub fn events_to_ics(events: &[Event], tz: Option<Tz>) -> Result<String, ScheduleError> {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//MindSync//EN\r\n");

    for (i, e) in events.iter().enumerate() {
        let dtstart = ics_time(&e.start, tz)?;
        let dtend = ics_time(&e.end, tz)?;

        s.push_str("BEGIN:VEVENT\r\n");
        s.push_str(&format!(
            "UID:mindsync-{}-{}@mindsync\r\n",
            e.start.format("%Y%m%dT%H%M%S"),
            i
        ));
        s.push_str(&format!("DTSTART:{}\r\n", dtstart));
        s.push_str(&format!("DTEND:{}\r\n", dtend));
        s.push_str(&fold_line(&format!("SUMMARY:{}", escape_ics(&e.title))));
        s.push_str("END:VEVENT\r\n");
    }

    s.push_str("END:VCALENDAR\r\n");
    Ok(s)
}

fn ics_time(dt: &NaiveDateTime, tz: Option<Tz>) -> Result<String, ScheduleError> {
    Ok(match tz {
        Some(tz) => local_to_utc(dt, tz)?.format("%Y%m%dT%H%M%SZ").to_string(),
        None => dt.format("%Y%m%dT%H%M%S").to_string(),
    })
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace(['\r', '\n'], "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// Fold a content line at 75 octets (RFC 5545 3.1), never splitting a UTF-8
/// sequence. Continuation lines start with a single space. Output ends in CRLF.
fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;

    let mut out = String::with_capacity(line.len() + 8);
    let mut width = 0;
    for ch in line.chars() {
        if width + ch.len_utf8() > LIMIT {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += ch.len_utf8();
    }
    out.push_str("\r\n");
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDateTime {
    pub date_time: String,
    pub time_zone: String,
}

/// Body of a remote calendar event insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteEvent {
    pub summary: String,
    pub start: RemoteDateTime,
    pub end: RemoteDateTime,
}

/// Build insert bodies for a remote calendar. Wall-clock times pass through
/// unchanged; `timezone` is the caller's IANA zone and must be valid.
pub fn remote_payloads(events: &[Event], timezone: &str) -> Result<Vec<RemoteEvent>, ScheduleError> {
    let tz = parse_timezone(timezone)?;
    let zone = tz.name().to_string();

    Ok(events
        .iter()
        .map(|e| RemoteEvent {
            summary: e.title.clone(),
            start: RemoteDateTime {
                date_time: format_wall_clock(&e.start),
                time_zone: zone.clone(),
            },
            end: RemoteDateTime {
                date_time: format_wall_clock(&e.end),
                time_zone: zone.clone(),
            },
        })
        .collect())
}

/// Plain-text agenda, one line per event.
pub fn render_agenda(events: &[Event]) -> String {
    if events.is_empty() {
        return "(no tasks scheduled)\n".to_string();
    }

    let mut s = String::new();
    for e in events {
        s.push_str(&format!(
            "{} - {}  {} ({}m)\n",
            e.start.format("%I:%M %p"),
            e.end.format("%I:%M %p"),
            e.title,
            e.duration_minutes()
        ));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mindsync_core::{layout, Task};

    fn events() -> Vec<Event> {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        layout(
            &[Task::new("Write report; draft, v2", 60), Task::new("Walk", 30)],
            start,
            10,
        )
        .unwrap()
    }

    #[test]
    fn test_ics_floating_times() {
        let ics = events_to_ics(&events(), None).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("DTSTART:20260302T090000\r\n"));
        assert!(ics.contains("DTEND:20260302T100000\r\n"));
        assert!(ics.contains("DTSTART:20260302T101000\r\n"));
    }

    #[test]
    fn test_ics_utc_with_timezone() {
        let ics = events_to_ics(&events(), Some(chrono_tz::Asia::Kolkata)).unwrap();
        assert!(ics.contains("DTSTART:20260302T033000Z\r\n"));
    }

    #[test]
    fn test_ics_escapes_summary() {
        let ics = events_to_ics(&events(), None).unwrap();
        assert!(ics.contains("SUMMARY:Write report\\; draft\\, v2\r\n"));
    }

    #[test]
    fn test_ics_escapes_carriage_returns() {
        let mut evs = events();
        evs[0].title = "line one\r\nline two\rthree".to_string();
        let ics = events_to_ics(&evs, None).unwrap();
        assert!(ics.contains("SUMMARY:line one\\nline two\\nthree\r\n"));
        for line in ics.split("\r\n") {
            assert!(!line.contains('\r') && !line.contains('\n'), "{line:?}");
        }
    }

    #[test]
    fn test_ics_folds_long_summary() {
        let mut evs = events();
        evs[0].title = "é".repeat(60);
        let ics = events_to_ics(&evs, None).unwrap();

        let lines: Vec<&str> = ics.split("\r\n").collect();
        assert!(lines.iter().all(|l| l.len() <= 75), "{lines:?}");

        let at = lines.iter().position(|l| l.starts_with("SUMMARY:")).unwrap();
        assert!(lines[at + 1].starts_with(' '));
        let unfolded = ics.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("SUMMARY:{}\r\n", "é".repeat(60))));
    }

    #[test]
    fn test_fold_line_short_is_untouched() {
        assert_eq!(fold_line("SUMMARY:Walk"), "SUMMARY:Walk\r\n");
        let exact = "x".repeat(75);
        assert_eq!(fold_line(&exact), format!("{exact}\r\n"));
    }

    #[test]
    fn test_ics_empty() {
        let ics = events_to_ics(&[], None).unwrap();
        assert!(!ics.contains("VEVENT"));
    }

    #[test]
    fn test_remote_payload_shape() {
        let payloads = remote_payloads(&events(), "Asia/Kolkata").unwrap();
        let json = serde_json::to_value(&payloads[1]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "summary": "Walk",
                "start": {"dateTime": "2026-03-02T10:10:00", "timeZone": "Asia/Kolkata"},
                "end": {"dateTime": "2026-03-02T10:40:00", "timeZone": "Asia/Kolkata"}
            })
        );
    }

    #[test]
    fn test_remote_payload_rejects_unknown_zone() {
        assert!(matches!(
            remote_payloads(&events(), "Atlantis/Capital"),
            Err(ScheduleError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_agenda() {
        let agenda = render_agenda(&events());
        assert!(agenda.starts_with("09:00 AM - 10:00 AM  Write report; draft, v2 (60m)\n"));
        assert_eq!(render_agenda(&[]), "(no tasks scheduled)\n");
    }
}
