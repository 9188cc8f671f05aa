//! Commands typed into the terminal.
//!
use std::{io::BufRead, path::PathBuf};

use tokio::sync::mpsc;

pub const HELP: &str = "\
Commands:
  open <path>   select an image file
  analyze       classify the selected file
  state         print what is currently displayed
  help          show this message
  quit          stop";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Analyze,
    State,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_lowercase().as_str() {
            "" => Command::Empty,
            "open" | "select" if !rest.is_empty() => Command::Open(PathBuf::from(rest)),
            "analyze" | "apply" => Command::Analyze,
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(line.to_owned()),
        }
    }
}

/// Forward lines read from `reader` over a channel.
///
/// Reading happens on a detached thread, so a pending read never holds up
/// runtime shutdown. The channel closes at end of input, after a read error,
/// or once the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(8);

    std::thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });

    rx
}
