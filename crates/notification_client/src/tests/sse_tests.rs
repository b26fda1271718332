use super::*;

fn events(messages: Vec<StreamMessage>) -> Vec<SseFrame> {
    messages
        .into_iter()
        .filter_map(|message| match message {
            StreamMessage::Event(frame) => Some(frame),
            StreamMessage::Retry(_) => None,
        })
        .collect()
}

#[test]
fn decodes_named_event_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: unread").is_empty());
    assert!(decoder.feed(b"Count\ndata: 4").is_empty());
    let frames = events(decoder.feed(b"\n\n"));

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event_name(), "unreadCount");
    assert_eq!(frames[0].data, "4");
}

#[test]
fn joins_multiple_data_lines_with_newline() {
    let mut decoder = SseDecoder::new();
    let frames = events(decoder.feed(b"data: first\ndata:second\n\n"));
    assert_eq!(frames[0].data, "first\nsecond");
    assert_eq!(frames[0].event_name(), "message");
}

#[test]
fn handles_crlf_and_lone_cr_line_endings() {
    let mut decoder = SseDecoder::new();
    let mut frames = events(decoder.feed(b"event: notification\r\ndata: {}\r"));
    frames.extend(events(decoder.feed(b"\n\r\n")));
    frames.extend(events(decoder.feed(b"data: x\r\r")));

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].event_name(), "notification");
    assert_eq!(frames[1].data, "x");
    assert_eq!(frames[1].event_name(), "message");
}

#[test]
fn ignores_comments_and_events_without_data() {
    let mut decoder = SseDecoder::new();
    let frames = events(decoder.feed(b": keep-alive\n\nevent: unreadChat\n\ndata: later\n\n"));

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].event_name(), "message");
    assert_eq!(frames[0].data, "later");
}

#[test]
fn reports_retry_and_remembers_last_id() {
    let mut decoder = SseDecoder::new();
    let messages = decoder.feed(b"retry: 1500\nid: 77\ndata: a\n\nretry: soon\ndata: b\n\n");

    assert_eq!(messages[0], StreamMessage::Retry(Duration::from_millis(1500)));
    let frames = events(messages);
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].id.as_deref(), Some("77"));
    assert_eq!(frames[1].id.as_deref(), Some("77"));
}

#[test]
fn strips_leading_byte_order_mark() {
    let mut decoder = SseDecoder::new();
    let frames = events(decoder.feed("\u{feff}event: unreadCount\ndata: 1\n\n".as_bytes()));
    assert_eq!(frames[0].event_name(), "unreadCount");
}

#[test]
fn incomplete_event_is_not_dispatched() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: notification\ndata: {\"id\":1}\n").is_empty());
}
