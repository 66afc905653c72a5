//! Parsing of console input lines.

use std::str::FromStr;

use thiserror::Error;

/// One operator command typed into the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Kill,
    Status,
    /// Newest `n` archives, or all of them.
    ListLogs(Option<usize>),
    GetLog(String),
    /// Zero-based page of the live buffer.
    Live(usize),
    Ping,
    Reboot,
    Help,
    Quit,
}

/// Why a console line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleParseError {
    #[error("No command given")]
    Empty,

    #[error("Unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{0}` is not a positive number")]
    InvalidNumber(String),
}

impl FromStr for ConsoleCommand {
    type Err = ConsoleParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(ConsoleParseError::Empty)?.to_lowercase();
        let argument = words.next();

        let parsed = match command.as_str() {
            "start" => Self::Start,
            "stop" => Self::Stop,
            "kill" => Self::Kill,
            "status" => Self::Status,
            "list-logs" | "list_logs" => Self::ListLogs(argument.map(parse_count).transpose()?),
            "get-log" | "get_log" => Self::GetLog(
                argument
                    .ok_or(ConsoleParseError::MissingArgument {
                        command: "get-log",
                        argument: "a log name or `latest`",
                    })?
                    .to_string(),
            ),
            "live" => Self::Live(argument.map(parse_count).transpose()?.map_or(0, |p| p - 1)),
            "ping" => Self::Ping,
            "reboot" | "restart-host" => Self::Reboot,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ConsoleParseError::Unknown(other.to_string())),
        };
        Ok(parsed)
    }
}

fn parse_count(raw: &str) -> Result<usize, ConsoleParseError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConsoleParseError::InvalidNumber(raw.to_string())),
    }
}
