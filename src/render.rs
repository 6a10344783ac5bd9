//! Board renderer: view state and the rows/frame derived from it.
//!
//! DESIGN
//! ======
//! `BoardView` holds the four pieces of view state: the local user, the last
//! server time, the board title, and the message list. A successful sync
//! replaces the board-derived state wholesale; there is no merge and no
//! reordering, so rows always mirror `Board.messages` one to one.
//!
//! Timestamps are shown as time-of-day in a fixed UTC offset chosen at
//! start-up. A timestamp that does not parse is shown verbatim.
//!
//! Everything that reaches the frame is plain text: control characters in
//! board data (`\r`, ESC, ...) are replaced before they hit the terminal, so
//! a message cannot rewrite its author, the own marker, or the screen.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::borrow::Cow;

use time::format_description::FormatItem;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use wire::{Board, StoredMessage};

use crate::identity::{MAX_USER_LEN, UserField};

const TIME_OF_DAY: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const OWN_MARKER: char = '*';
/// Stands in for control characters so board text cannot drive the terminal.
const CONTROL_REPLACEMENT: char = '\u{FFFD}';

/// Visual class of a message row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowClass {
    /// Authored by the local user.
    Own,
    /// Authored by someone else.
    Other,
}

impl RowClass {
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Own => "own_message",
            Self::Other => "other_message",
        }
    }
}

/// One rendered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRow<'a> {
    pub user: &'a str,
    pub time: String,
    /// Content split on `\n`, rendered as plain text.
    pub lines: Vec<&'a str>,
    pub class: RowClass,
}

/// View state for one chat session.
#[derive(Clone, Debug)]
pub struct BoardView {
    offset: UtcOffset,
    user: UserField,
    title: String,
    server_time: Option<String>,
    messages: Vec<StoredMessage>,
}

impl BoardView {
    /// Empty view for `user`, formatting times in `offset`.
    #[must_use]
    pub fn new(user: UserField, offset: UtcOffset) -> Self {
        Self { offset, user, title: String::new(), server_time: None, messages: Vec::new() }
    }

    /// Replace title, server time, and messages with a fresh snapshot.
    pub fn apply(&mut self, board: Board) {
        self.title = board.title;
        self.server_time = Some(board.time);
        self.messages = board.messages;
    }

    #[must_use]
    pub fn user(&self) -> &UserField {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut UserField {
        &mut self.user
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Last server time as time-of-day, once a board has been applied.
    #[must_use]
    pub fn server_time(&self) -> Option<String> {
        self.server_time.as_deref().map(|t| format_time_of_day(t, self.offset))
    }

    #[must_use]
    pub fn messages(&self) -> &[StoredMessage] {
        &self.messages
    }

    /// A message is own iff its author equals the current name byte-for-byte.
    #[must_use]
    pub fn is_own(&self, message: &StoredMessage) -> bool {
        message.user == self.user.name()
    }

    /// Rows in board order, one per message.
    #[must_use]
    pub fn rows(&self) -> Vec<MessageRow<'_>> {
        self.messages
            .iter()
            .map(|m| MessageRow {
                user: &m.user,
                time: format_time_of_day(&m.time, self.offset),
                lines: m.content.split('\n').collect(),
                class: if self.is_own(m) { RowClass::Own } else { RowClass::Other },
            })
            .collect()
    }

    /// Render the whole view as a terminal frame: top bar, rows, status line.
    #[must_use]
    pub fn render_text(&self) -> String {
        let rows = self.rows();
        let users: Vec<Cow<'_, str>> = rows.iter().map(|r| printable(r.user)).collect();
        let user_width = users.iter().map(|u| u.chars().count()).max().unwrap_or(0);

        let mut out = format!(
            "== {} == {}\n",
            printable(&self.title),
            printable(&self.server_time().unwrap_or_default())
        );
        for (row, user) in rows.iter().zip(&users) {
            let marker = match row.class {
                RowClass::Own => OWN_MARKER,
                RowClass::Other => ' ',
            };
            let time = printable(&row.time);
            let mut lines = row.lines.iter().map(|line| printable(line));
            let first = lines.next().unwrap_or_default();
            out.push_str(&format!("{marker} {user:<user_width$}  {time}  {first}\n"));
            let indent = 2 + user_width + 2 + time.chars().count() + 2;
            for line in lines {
                out.push_str(&format!("{:indent$}{line}\n", ""));
            }
        }
        if self.user.is_valid() {
            out.push_str(&format!("-- as {} --\n", printable(self.user.name())));
        } else {
            out.push_str(&format!(
                "-- as {:?}: invalid name (1-{MAX_USER_LEN} characters), sending disabled --\n",
                self.user.name()
            ));
        }
        out
    }
}

/// Board text with every control character replaced, so `\r` or escape
/// sequences render as visible glyphs instead of moving the cursor.
#[must_use]
pub fn printable(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_control) {
        Cow::Owned(
            text.chars()
                .map(|c| if c.is_control() { CONTROL_REPLACEMENT } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// Format an ISO-8601 timestamp as `HH:MM:SS` in `offset`.
///
/// Timestamps without an offset are read as local time. Unparseable input is
/// returned unchanged.
#[must_use]
pub fn format_time_of_day(raw: &str, offset: UtcOffset) -> String {
    let Some(parsed) = parse_timestamp(raw, offset) else {
        return raw.to_owned();
    };
    match parsed.to_offset(offset).format(TIME_OF_DAY) {
        Ok(formatted) => formatted,
        Err(_) => raw.to_owned(),
    }
}

fn parse_timestamp(raw: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(t) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(t);
    }
    if let Ok(t) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(t);
    }
    match PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT) {
        Ok(t) => Some(t.assume_offset(offset)),
        Err(_) => None,
    }
}
