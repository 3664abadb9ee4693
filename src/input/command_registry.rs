//! Command registry and parser for the practice REPL.
//!
//! The completer, the help text and the parser all read from [`COMMANDS`].

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: &'static str,
    /// Argument synopsis shown in help, empty when the command takes none.
    pub usage: &'static str,
    pub description: &'static str,
}

pub static COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "topic",
        usage: "<text>",
        description: "Set the quiz topic",
    },
    CommandEntry {
        name: "count",
        usage: "<n>",
        description: "Set how many questions to generate (1-100)",
    },
    CommandEntry {
        name: "difficulty",
        usage: "<easy|medium|hard>",
        description: "Set the difficulty",
    },
    CommandEntry {
        name: "generate",
        usage: "",
        description: "Generate a new quiz from the current form",
    },
    CommandEntry {
        name: "answer",
        usage: "<n> <key>",
        description: "Answer question n with an option key",
    },
    CommandEntry {
        name: "practice",
        usage: "",
        description: "Toggle practice mode",
    },
    CommandEntry {
        name: "score",
        usage: "",
        description: "Show the current score",
    },
    CommandEntry {
        name: "show",
        usage: "",
        description: "Show the form and the current quiz",
    },
    CommandEntry {
        name: "export",
        usage: "[dir]",
        description: "Export the quiz to PDF",
    },
    CommandEntry {
        name: "help",
        usage: "",
        description: "Show available commands",
    },
    CommandEntry {
        name: "quit",
        usage: "",
        description: "Leave the REPL",
    },
];

impl CommandEntry {
    /// Name followed by the argument synopsis, if any.
    pub fn synopsis(&self) -> String {
        if self.usage.is_empty() {
            self.name.to_string()
        } else {
            format!("{} {}", self.name, self.usage)
        }
    }
}

pub fn find(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|c| c.name == name)
}

fn usage_error(name: &str) -> String {
    match find(name) {
        Some(entry) => format!("Usage: {}", entry.synopsis()),
        None => format!("Unknown command '{}'. Type 'help'.", name),
    }
}

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Topic(String),
    /// Raw count text; the form decides how to coerce it.
    Count(String),
    /// Raw difficulty text; the form validates it.
    Difficulty(String),
    Generate,
    /// One-based question number as typed.
    Answer { number: usize, key: String },
    TogglePractice,
    Score,
    Show,
    Export(Option<String>),
    /// `help` alone lists everything; `help <command>` shows one entry.
    Help(Option<&'static CommandEntry>),
    Quit,
    Empty,
}

/// Parse one REPL line. Errors are user-facing one-liners.
pub fn parse(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Empty);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "topic" => {
            if rest.is_empty() {
                Err(usage_error("topic"))
            } else {
                Ok(ReplCommand::Topic(rest.to_string()))
            }
        }
        "count" => {
            if rest.is_empty() {
                Err(usage_error("count"))
            } else {
                Ok(ReplCommand::Count(rest.to_string()))
            }
        }
        "difficulty" => {
            if rest.is_empty() {
                Err(usage_error("difficulty"))
            } else {
                Ok(ReplCommand::Difficulty(rest.to_string()))
            }
        }
        "generate" | "gen" => Ok(ReplCommand::Generate),
        "answer" | "a" => {
            let mut parts = rest.split_whitespace();
            let number = parts.next().and_then(|n| n.parse::<usize>().ok());
            let key = parts.next();
            match (number, key, parts.next()) {
                (Some(number), Some(key), None) if number >= 1 => Ok(ReplCommand::Answer {
                    number,
                    key: key.to_string(),
                }),
                _ => Err(usage_error("answer")),
            }
        }
        "practice" => Ok(ReplCommand::TogglePractice),
        "score" => Ok(ReplCommand::Score),
        "show" => Ok(ReplCommand::Show),
        "export" => Ok(ReplCommand::Export(
            (!rest.is_empty()).then(|| rest.to_string()),
        )),
        "help" | "?" => {
            if rest.is_empty() {
                Ok(ReplCommand::Help(None))
            } else {
                let name = rest.to_ascii_lowercase();
                find(&name)
                    .map(|entry| ReplCommand::Help(Some(entry)))
                    .ok_or_else(|| usage_error(&name))
            }
        }
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
    }
}
