//! In-room chat feed.
//!
//! The feed is a bounded, append-only log of formatted lines. The rule engine
//! writes round notices into it; user input is validated here before being
//! sent to the room.

use std::collections::VecDeque;

use crate::error::GuardianError;
use crate::player::PlayerId;

/// Maximum number of lines kept in the feed.
pub const MAX_STORED_MESSAGES: usize = 100;
/// Maximum length of one message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 1000;

const SYSTEM_COLOR: &str = "#FFCC00";
const ERROR_COLOR: &str = "#FF0000";
/// Color used for round-lifecycle notices written by the gamemode.
pub const NOTICE_COLOR: &str = "#FFC000";

/// Bounded log of chat lines, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ChatFeed {
    messages: VecDeque<String>,
}

impl ChatFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Over-long lines are replaced by an error line.
    pub fn add_message(&mut self, message: &str) {
        let message = message.trim();
        if message.chars().count() > MAX_MESSAGE_LENGTH {
            self.push(error_line(&too_long_reason()));
            return;
        }
        self.push(message.to_string());
    }

    pub fn add_system_message(&mut self, input: &str) {
        self.push(system_line(input));
    }

    pub fn add_error_message(&mut self, input: &str) {
        self.push(error_line(input));
    }

    pub fn add_error_not_master_client(&mut self) {
        self.add_error_message("Not Master Client");
    }

    pub fn add_error_player_not_found(&mut self, player_id: &str) {
        self.add_error_message(&format!("No player with ID #{player_id} could be found."));
    }

    /// Report a rejected input. Only transient errors belong in the feed.
    pub fn report(&mut self, err: &GuardianError) {
        match err {
            GuardianError::TransientInput(reason) => self.add_error_message(reason),
            other => tracing::warn!(error = %other, "Non-chat error routed to chat feed"),
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    /// The feed rendered as one block, one line per message.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for message in &self.messages {
            out.push_str(message);
            out.push('\n');
        }
        out
    }

    fn push(&mut self, line: String) {
        if self.messages.len() == MAX_STORED_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(line);
    }
}

/// What a submitted input line turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// A line starting with `/`.
    Command { name: String, args: Vec<String> },
    /// A validated message ready to be sent to the room.
    Message(String),
}

/// Classify and validate a line the local player submitted.
///
/// Returns `Ok(None)` for an empty line.
pub fn parse_chat_input(input: &str) -> Result<Option<ChatInput>, GuardianError> {
    if input.is_empty() {
        return Ok(None);
    }
    if let Some(command) = input.strip_prefix('/') {
        let mut parts = command.split_whitespace().map(str::to_string);
        let name = parts.next().unwrap_or_default();
        return Ok(Some(ChatInput::Command {
            name,
            args: parts.collect(),
        }));
    }
    if input.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(GuardianError::TransientInput(too_long_reason()));
    }
    if !markup_is_ok(input) {
        return Err(GuardianError::TransientInput("Bad markup.".to_string()));
    }
    Ok(Some(ChatInput::Message(input.to_string())))
}

/// Rich-text tags must be balanced: an even number of angle brackets.
pub fn markup_is_ok(message: &str) -> bool {
    message.chars().filter(|c| matches!(c, '<' | '>')).count() % 2 == 0
}

pub fn system_line(input: &str) -> String {
    format!("<color={SYSTEM_COLOR}>{input}</color>")
}

pub fn error_line(input: &str) -> String {
    format!("<color={ERROR_COLOR}>Error: {input}</color>")
}

/// Round-lifecycle notice line, e.g. `(12.50) Round ended (game win).`
pub fn notice_line(round_time: f32, text: &str) -> String {
    format!("<color={NOTICE_COLOR}>({round_time:.2})</color> {text}")
}

/// Line naming a non-authority participant that ended the round.
pub fn foreign_round_end_line(sender: PlayerId) -> String {
    format!("<color={NOTICE_COLOR}>Round end sent from Player {sender}</color>")
}

fn too_long_reason() -> String {
    format!("Message can not have more than {MAX_MESSAGE_LENGTH} characters")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_evicts_oldest_at_capacity() {
        let mut feed = ChatFeed::new();
        for i in 0..=MAX_STORED_MESSAGES {
            feed.add_message(&format!("line {i}"));
        }
        assert_eq!(feed.len(), MAX_STORED_MESSAGES);
        assert_eq!(feed.messages().next(), Some("line 1"));
        assert_eq!(feed.last(), Some("line 100"));
    }

    #[test]
    fn feed_trims_messages() {
        let mut feed = ChatFeed::new();
        feed.add_message("   hello  \n");
        assert_eq!(feed.last(), Some("hello"));
    }

    #[test]
    fn overlong_message_replaced_by_error() {
        let mut feed = ChatFeed::new();
        feed.add_message(&"a".repeat(MAX_MESSAGE_LENGTH + 1));
        assert_eq!(
            feed.last(),
            Some("<color=#FF0000>Error: Message can not have more than 1000 characters</color>")
        );
    }

    #[test]
    fn message_at_limit_accepted() {
        let mut feed = ChatFeed::new();
        feed.add_message(&"a".repeat(MAX_MESSAGE_LENGTH));
        assert_eq!(feed.last().map(str::len), Some(MAX_MESSAGE_LENGTH));
    }

    #[test]
    fn empty_input_is_nothing() {
        assert_eq!(parse_chat_input("").unwrap(), None);
    }

    #[test]
    fn slash_prefix_is_command() {
        let parsed = parse_chat_input("/kick 4 spam").unwrap();
        assert_eq!(
            parsed,
            Some(ChatInput::Command {
                name: "kick".to_string(),
                args: vec!["4".to_string(), "spam".to_string()],
            })
        );
    }

    #[test]
    fn odd_markup_is_transient_error() {
        let err = parse_chat_input("<b>bold").unwrap_err();
        assert_eq!(err, GuardianError::TransientInput("Bad markup.".to_string()));
        assert!(!err.is_fatal());
    }

    #[test]
    fn balanced_markup_and_commas_accepted() {
        let parsed = parse_chat_input("<b>hello, world</b>").unwrap();
        assert_eq!(
            parsed,
            Some(ChatInput::Message("<b>hello, world</b>".to_string()))
        );
    }

    #[test]
    fn overlong_input_rejected() {
        let err = parse_chat_input(&"a".repeat(MAX_MESSAGE_LENGTH + 1)).unwrap_err();
        assert!(matches!(err, GuardianError::TransientInput(_)));
    }

    #[test]
    fn report_writes_error_line() {
        let mut feed = ChatFeed::new();
        feed.report(&GuardianError::TransientInput("Bad markup.".to_string()));
        assert_eq!(feed.last(), Some("<color=#FF0000>Error: Bad markup.</color>"));
    }

    #[test]
    fn canned_errors() {
        let mut feed = ChatFeed::new();
        feed.add_error_not_master_client();
        assert_eq!(feed.last(), Some("<color=#FF0000>Error: Not Master Client</color>"));
        feed.add_error_player_not_found("12");
        assert_eq!(
            feed.last(),
            Some("<color=#FF0000>Error: No player with ID #12 could be found.</color>")
        );
    }

    #[test]
    fn notice_formats_round_time() {
        assert_eq!(
            notice_line(12.5, "Round ended (game win)."),
            "<color=#FFC000>(12.50)</color> Round ended (game win)."
        );
    }

    #[test]
    fn render_joins_lines() {
        let mut feed = ChatFeed::new();
        feed.add_message("a");
        feed.add_system_message("b");
        assert_eq!(feed.render(), "a\n<color=#FFCC00>b</color>\n");
    }
}
