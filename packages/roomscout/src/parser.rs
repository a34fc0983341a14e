//! Chat-export parsing.
//!
//! Extracts the human-authored message body from a raw export block,
//! stripping timestamps, sender metadata, and membership notices.

use regex::Regex;
use tracing::debug;

use crate::types::message::ParsedMessage;

/// Notice fragments that mark a timestamped line as a system event rather
/// than a message.
const SYSTEM_NOTICES: &[&str] = &[
    "joined using",
    "changed to",
    "created group",
    "created this group",
    "changed the subject",
    "changed this group's icon",
    "messages and calls are end-to-end encrypted",
    "added you",
    "left the group",
];

/// Parser for WhatsApp-style chat export text.
///
/// A line shaped like `8/7/24, 7:46 PM - Dana: message text` starts message
/// accumulation at the text after the sender separator; following lines
/// that don't match the shape are continuation lines of the same message.
/// Timestamped lines without a sender separator are system notices and are
/// dropped. If nothing matches the export shape, the raw input is the body.
#[derive(Debug, Clone)]
pub struct ChatLogParser {
    message_start: Regex,
    timestamp_prefix: Regex,
}

impl Default for ChatLogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLogParser {
    pub fn new() -> Self {
        Self {
            // `[8/7/24, 7:46:21 PM] Dana: text` and `8/7/24, 7:46 PM - Dana: text`
            message_start: Regex::new(
                r"^\[?\d{1,2}/\d{1,2}/\d{2,4},?\s+\d{1,2}:\d{2}(?::\d{2})?\s*(?:[AaPp][Mm])?\]?\s*[-\u{2013}\u{2014}]?\s*([^:]+):\s(.*)$",
            )
            .unwrap(),
            timestamp_prefix: Regex::new(r"^\[?\d{1,2}/\d{1,2}/\d{2,4},?\s+\d{1,2}:\d{2}").unwrap(),
        }
    }

    /// Parse a raw export block into its message body.
    ///
    /// Never fails outward: when the input has no recognizable export
    /// structure the raw text is carried through verbatim, stamped with the
    /// current processing time.
    pub fn parse(&self, raw: &str) -> ParsedMessage {
        let mut segments: Vec<String> = Vec::new();
        let mut matched_any = false;

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.message_start.captures(line) {
                let text = caps.get(2).map_or("", |m| m.as_str()).trim();
                if is_system_notice(text) {
                    continue;
                }
                matched_any = true;
                segments.push(text.to_string());
            } else if self.timestamp_prefix.is_match(line) {
                // Timestamped but no sender separator: membership/system event.
                debug!(line, "dropping system notice line");
            } else if matched_any {
                // Continuation of the current message.
                if let Some(last) = segments.last_mut() {
                    last.push('\n');
                    last.push_str(line);
                }
            }
        }

        if !matched_any {
            return ParsedMessage::verbatim(raw);
        }

        let body = segments.join("\n");
        if body.trim().is_empty() {
            return ParsedMessage::verbatim(raw);
        }

        ParsedMessage::new(raw, body)
    }
}

fn is_system_notice(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SYSTEM_NOTICES.iter().any(|n| lowered.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extracts_message_after_sender_separator() {
        let parser = ChatLogParser::new();
        let raw = "8/7/24, 7:46 PM - Dana: Studio apt available Back Bay $2200/month";
        let parsed = parser.parse(raw);
        assert_eq!(parsed.body, "Studio apt available Back Bay $2200/month");
        assert_eq!(parsed.original, raw);
    }

    #[test]
    fn joins_continuation_lines() {
        let parser = ChatLogParser::new();
        let raw = "8/7/24, 7:46 PM - Dana: Room available in Mission Hill\n$800/month utilities included\nDM me for details";
        let parsed = parser.parse(raw);
        assert_eq!(
            parsed.body,
            "Room available in Mission Hill\n$800/month utilities included\nDM me for details"
        );
    }

    #[test]
    fn drops_membership_notices() {
        let parser = ChatLogParser::new();
        let raw = "8/7/24, 7:40 PM - Priya joined using this group's invite link\n8/7/24, 7:46 PM - Dana: Room available $800/month";
        let parsed = parser.parse(raw);
        assert_eq!(parsed.body, "Room available $800/month");
    }

    #[test]
    fn bracketed_export_format_is_recognized() {
        let parser = ChatLogParser::new();
        let raw = "[8/7/24, 7:46:21 PM] Dana: 1BR in Fenway, $1400/month";
        let parsed = parser.parse(raw);
        assert_eq!(parsed.body, "1BR in Fenway, $1400/month");
    }

    #[test]
    fn unstructured_text_passes_through_verbatim() {
        let parser = ChatLogParser::new();
        let raw = "Looking for a room in Mission Hill, budget $800/month. Any leads?";
        let parsed = parser.parse(raw);
        assert_eq!(parsed.body, raw);
    }

    #[test]
    fn multiple_messages_are_newline_joined() {
        let parser = ChatLogParser::new();
        let raw = "8/7/24, 7:46 PM - Dana: Room available $800\n8/7/24, 7:50 PM - Omar: Is it furnished?";
        let parsed = parser.parse(raw);
        assert_eq!(parsed.body, "Room available $800\nIs it furnished?");
    }

    proptest! {
        #[test]
        fn body_is_nonempty_for_nonempty_input(raw in ".{1,300}") {
            let parser = ChatLogParser::new();
            let parsed = parser.parse(&raw);
            prop_assert!(!parsed.body.is_empty());
        }
    }
}
