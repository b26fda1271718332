use std::time::Duration;

const DEFAULT_EVENT: &str = "message";
const BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

impl SseFrame {
    pub fn event_name(&self) -> &str {
        if self.event.is_empty() {
            DEFAULT_EVENT
        } else {
            &self.event
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamMessage {
    Event(SseFrame),
    Retry(Duration),
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    skip_lf: bool,
    seen_first_line: bool,
    event: String,
    data: String,
    last_event_id: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamMessage> {
        let mut out = Vec::new();
        for &byte in chunk {
            match byte {
                b'\n' if self.skip_lf => {
                    self.skip_lf = false;
                }
                b'\r' | b'\n' => {
                    self.skip_lf = byte == b'\r';
                    let line = std::mem::take(&mut self.line);
                    if let Some(message) = self.process_line(&line) {
                        out.push(message);
                    }
                }
                _ => {
                    self.skip_lf = false;
                    self.line.push(byte);
                }
            }
        }
        out
    }

    fn process_line(&mut self, raw: &[u8]) -> Option<StreamMessage> {
        let decoded = String::from_utf8_lossy(raw);
        let mut line: &str = &decoded;
        if !self.seen_first_line {
            self.seen_first_line = true;
            line = line.strip_prefix(BOM).unwrap_or(line);
        }

        if line.is_empty() {
            return self.dispatch().map(StreamMessage::Event);
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = value.to_string(),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            "retry" if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
                if let Ok(millis) = value.parse::<u64>() {
                    return Some(StreamMessage::Retry(Duration::from_millis(millis)));
                }
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = std::mem::take(&mut self.event);
        if self.data.is_empty() {
            return None;
        }
        let mut data = std::mem::take(&mut self.data);
        data.pop();
        Some(SseFrame {
            event,
            data,
            id: self.last_event_id.clone(),
        })
    }
}

#[cfg(test)]
#[path = "tests/sse_tests.rs"]
mod tests;
