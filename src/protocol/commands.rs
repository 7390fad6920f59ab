//! Module `commands`
//!
//! Defines the parsed command value, the verb dispatch table, and the
//! result type handlers hand back to the session loop.

use crate::protocol::responses::Reply;

/// One control line split into its verb and arguments.
///
/// The verb is upper-cased; arguments are kept in order and individually
/// trimmed. No argument-count checking happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(verb: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            verb: verb.into(),
            args,
        }
    }

    /// Looks the verb up in the dispatch table.
    pub fn kind(&self) -> Option<Verb> {
        Verb::from_token(&self.verb)
    }

    /// The first non-empty argument. Doubled spaces leave empty tokens
    /// behind, which are skipped.
    pub fn first_arg(&self) -> Option<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .find(|arg| !arg.is_empty())
    }

    /// All arguments re-joined with single spaces, so a path containing
    /// spaces comes back intact. `None` when nothing was supplied.
    pub fn argument(&self) -> Option<String> {
        let joined = self.args.join(" ");
        let joined = joined.trim();
        if joined.is_empty() {
            None
        } else {
            Some(joined.to_string())
        }
    }
}

/// Represents an FTP command this server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    User,
    Pass,
    Type,
    Pasv,
    List,
    Stor,
    Put,
    Quit,
}

/// Verb token to variant. Anything not in here gets a 502.
const VERB_TABLE: &[(&str, Verb)] = &[
    ("USER", Verb::User),
    ("PASS", Verb::Pass),
    ("TYPE", Verb::Type),
    ("PASV", Verb::Pasv),
    ("LIST", Verb::List),
    ("STOR", Verb::Stor),
    ("PUT", Verb::Put),
    ("QUIT", Verb::Quit),
];

impl Verb {
    pub fn from_token(token: &str) -> Option<Verb> {
        VERB_TABLE
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, verb)| *verb)
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
///
/// `message` is the final reply; `None` means nothing more is written
/// (QUIT closes without a reply).
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<Reply>,
}

impl CommandResult {
    pub fn success(reply: Reply) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(reply),
        }
    }

    pub fn failure(reason: impl Into<String>, reply: Reply) -> Self {
        Self {
            status: CommandStatus::Failure(reason.into()),
            message: Some(reply),
        }
    }

    pub fn close() -> Self {
        Self {
            status: CommandStatus::CloseConnection,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_table_lookup() {
        for (name, verb) in VERB_TABLE {
            assert_eq!(Verb::from_token(name), Some(*verb));
        }
        assert_eq!(Command::new("PASV", vec![]).kind(), Some(Verb::Pasv));
    }

    #[test]
    fn test_unknown_and_lowercase_tokens() {
        assert_eq!(Verb::from_token("FOO"), None);
        assert_eq!(Verb::from_token(""), None);
        // the parser upper-cases before lookup
        assert_eq!(Verb::from_token("list"), None);
    }

    #[test]
    fn test_arguments() {
        let cmd = Command::new("STOR", vec!["my".into(), "file.txt".into()]);
        assert_eq!(cmd.first_arg(), Some("my"));
        assert_eq!(cmd.argument().as_deref(), Some("my file.txt"));

        let cmd = Command::new("USER", vec!["".into(), "bob".into()]);
        assert_eq!(cmd.first_arg(), Some("bob"));
        assert_eq!(cmd.argument().as_deref(), Some("bob"));

        let cmd = Command::new("STOR", vec!["".into()]);
        assert_eq!(cmd.first_arg(), None);
        assert_eq!(cmd.argument(), None);

        let cmd = Command::new("LIST", vec![]);
        assert_eq!(cmd.argument(), None);
    }
}
