//! Console chat session over any `Conversation`.
//!
//! A failed send is shown to the user and ends the session; there is no
//! retry.

use anyhow::Result;
use std::io::{BufRead, Write};

/// Request/response text channel to the assistant.
pub trait Conversation {
    fn send(&mut self, query: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// User typed `quit` or `exit`
    UserQuit,
    /// Input stream reached EOF
    InputClosed,
    /// The conversation returned an error
    Failed,
}

fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit")
}

pub fn run_session<C, R, W>(conversation: &mut C, mut input: R, out: &mut W) -> Result<SessionEnd>
where
    C: Conversation,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Finance chat is ready! (Type 'quit' or 'exit' to end the chat)")?;
    writeln!(out, "{}", "-".repeat(30))?;

    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(SessionEnd::InputClosed);
        }

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_exit_command(query) {
            writeln!(out, "\nGoodbye! Thanks for chatting.")?;
            return Ok(SessionEnd::UserQuit);
        }

        match conversation.send(query) {
            Ok(reply) => writeln!(out, "Finmate: {reply}\n")?,
            Err(e) => {
                writeln!(out, "An error occurred: {e:#}")?;
                return Ok(SessionEnd::Failed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::io::Cursor;

    /// Echoes queries; fails once `fail_after` replies have been sent.
    struct Scripted {
        sent: Vec<String>,
        fail_after: Option<usize>,
    }

    impl Scripted {
        fn new(fail_after: Option<usize>) -> Self {
            Self { sent: Vec::new(), fail_after }
        }
    }

    impl Conversation for Scripted {
        fn send(&mut self, query: &str) -> Result<String> {
            if self.fail_after == Some(self.sent.len()) {
                bail!("quota exceeded");
            }
            self.sent.push(query.to_string());
            Ok(format!("echo {query}"))
        }
    }

    fn run(conv: &mut Scripted, script: &str) -> (SessionEnd, String) {
        let mut out = Vec::new();
        let end = run_session(conv, Cursor::new(script.as_bytes().to_vec()), &mut out).unwrap();
        (end, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_quit_ends_session() {
        let mut conv = Scripted::new(None);
        let (end, out) = run(&mut conv, "What is an index fund?\n  QUIT \nignored\n");
        assert_eq!(end, SessionEnd::UserQuit);
        assert_eq!(conv.sent, vec!["What is an index fund?"]);
        assert!(out.contains("Finmate: echo What is an index fund?"));
        assert!(out.contains("Goodbye"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut conv = Scripted::new(None);
        let (end, _) = run(&mut conv, "\n   \nexit\n");
        assert_eq!(end, SessionEnd::UserQuit);
        assert!(conv.sent.is_empty());
    }

    #[test]
    fn test_error_is_surfaced_and_ends_session() {
        let mut conv = Scripted::new(Some(1));
        let (end, out) = run(&mut conv, "first\nsecond\nthird\n");
        assert_eq!(end, SessionEnd::Failed);
        assert_eq!(conv.sent, vec!["first"]);
        assert!(out.contains("An error occurred: quota exceeded"));
        assert!(!out.contains("third"));
    }

    #[test]
    fn test_eof_closes_session() {
        let mut conv = Scripted::new(None);
        let (end, _) = run(&mut conv, "hello");
        assert_eq!(end, SessionEnd::InputClosed);
        assert_eq!(conv.sent, vec!["hello"]);
    }
}
