/// Incremental decoder for a server-sent-event byte stream.
///
/// Frames arrive as arbitrary chunks; records are terminated by a blank
/// line (LF or CRLF). Only `data:` fields matter here; multi-line data is
/// joined with newlines, comments and other fields are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the data payloads of every record that
    /// became complete.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some((end, skip)) = find_record_end(&self.buf) {
            let record: Vec<u8> = self.buf.drain(..end + skip).collect();
            let text = String::from_utf8_lossy(&record[..end]);
            if let Some(payload) = parse_record(&text) {
                payloads.push(payload);
            }
        }
        payloads
    }
}

/// Locate the first blank-line separator, tolerating CRLF line endings.
/// Returns (record length, separator length).
fn find_record_end(buf: &[u8]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i + 1 < buf.len() {
        if buf[i] == b'\n' {
            if buf[i + 1] == b'\n' {
                return Some((i + 1, 1));
            }
            if i + 3 <= buf.len() && buf[i + 1] == b'\r' && buf.get(i + 2) == Some(&b'\n') {
                return Some((i + 1, 2));
            }
        }
        i += 1;
    }
    None
}

fn parse_record(record: &str) -> Option<String> {
    let mut data_lines = Vec::new();
    // `lines()` already strips the trailing `\r` of CRLF endings.
    for line in record.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}
