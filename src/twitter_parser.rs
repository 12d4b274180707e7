/// Twitter's `created_at` format, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Serde adapter for `created_at` fields.
pub mod twitter_date {
    use super::TWITTER_DATE_FORMAT;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(TWITTER_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&raw, TWITTER_DATE_FORMAT)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Splits a chunked streaming body into complete messages.
///
/// Messages are delimited by `\r\n`; blank lines are keep-alives and are
/// dropped. A trailing partial message stays buffered until more bytes arrive.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every message it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut messages = Vec::new();
        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            let message = String::from_utf8_lossy(&line).trim().to_string();
            if !message.is_empty() {
                messages.push(message);
            }
        }
        messages
    }

    /// Whatever is left once the connection closes.
    pub fn finish(self) -> Option<String> {
        let rest = String::from_utf8_lossy(&self.buffer).trim().to_string();
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(serde::Deserialize, serde::Serialize)]
    struct Dated {
        #[serde(with = "twitter_date")]
        created_at: DateTime<Utc>,
    }

    #[test]
    fn test_parse_twitter_date_normalizes_to_utc() {
        let dated: Dated =
            serde_json::from_str(r#"{"created_at": "Mon Jan 02 10:00:00 +0200 2023"}"#).unwrap();
        assert_eq!(
            dated.created_at,
            Utc.with_ymd_and_hms(2023, 1, 2, 8, 0, 0).unwrap()
        );

        let json = serde_json::to_string(&dated).unwrap();
        assert_eq!(json, r#"{"created_at":"Mon Jan 02 08:00:00 +0000 2023"}"#);
    }

    #[test]
    fn test_parse_twitter_date_rejects_iso() {
        let result: Result<Dated, _> =
            serde_json::from_str(r#"{"created_at": "2023-01-01T00:00:00Z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_line_buffer_splits_and_skips_keepalives() {
        let mut lines = LineBuffer::new();
        assert_eq!(lines.push(b"{\"id\":1}\r\n\r\n{\"id\""), vec!["{\"id\":1}"]);
        assert_eq!(lines.push(b":2}\r\n"), vec!["{\"id\":2}"]);
        assert!(lines.push(b"\r\n").is_empty());
        assert_eq!(lines.finish(), None);
    }

    #[test]
    fn test_line_buffer_finish_returns_partial() {
        let mut lines = LineBuffer::new();
        assert!(lines.push(b"{\"id\":3}").is_empty());
        assert_eq!(lines.finish(), Some("{\"id\":3}".to_string()));
    }
}
