//! Terminal input parsing

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Typed reply
    Text(String),
    /// Quick reply picked from the offered options
    Option(String),
    Like(usize),
    Dislike(usize),
    Restart,
    Transcript,
    Quit,
}

/// Why a line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Empty,
    /// Free text while options are on offer
    PickAnOption(usize),
    BadIndex(String),
    UnknownCommand(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::Empty => write!(f, "Please type a reply"),
            InputError::PickAnOption(n) => {
                write!(f, "Please pick one of the options (1-{}) or type it exactly", n)
            },
            InputError::BadIndex(arg) => write!(f, "Not a message number: {}", arg),
            InputError::UnknownCommand(cmd) => write!(f, "Unknown command: {}", cmd),
        }
    }
}

/// Parse a line against the currently offered options
///
/// While options are on offer free text is disabled: the line must be an
/// option number or the exact option text.
pub fn parse(line: &str, offered: Option<&[String]>) -> Result<Command, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputError::Empty);
    }

    if let Some(rest) = line.strip_prefix('/') {
        return parse_command(rest);
    }

    match offered {
        Some(options) => {
            if let Ok(n) = line.parse::<usize>() {
                if let Some(option) = n.checked_sub(1).and_then(|i| options.get(i)) {
                    return Ok(Command::Option(option.clone()));
                }
            }
            options
                .iter()
                .find(|o| o.as_str() == line)
                .map(|o| Command::Option(o.clone()))
                .ok_or(InputError::PickAnOption(options.len()))
        },
        None => Ok(Command::Text(line.to_string())),
    }
}

fn parse_command(rest: &str) -> Result<Command, InputError> {
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    match name {
        "like" | "dislike" => {
            let arg = parts.next().unwrap_or_default();
            let index = arg
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| InputError::BadIndex(arg.to_string()))?;
            if name == "like" {
                Ok(Command::Like(index))
            } else {
                Ok(Command::Dislike(index))
            }
        },
        "restart" => Ok(Command::Restart),
        "transcript" => Ok(Command::Transcript),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}
