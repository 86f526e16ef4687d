//! Interactive session: reads commands from stdin while the countdown runs.
//!
//! This is the form boundary. Input is validated here before anything is
//! dispatched, so the store only sees well-formed start actions.

use std::io::{self, BufRead, Write};

use chrono::Utc;
use cronos_core::{validate_new_cycle, CronosEngine, HistoryOrder, TickOutcome};

use crate::error::CliError;
use crate::report;

const HELP: &str = "\
Commands:
  start <minutes> <task>   start a focus cycle (5-60 minutes)
  stop                     interrupt the active cycle
  status                   show remaining time
  history                  list cycles, newest first
  help                     show this help
  quit                     leave (a running cycle keeps its start time)";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Start { minutes: u32, task: String },
    Stop,
    Status,
    History,
    Help,
    Quit,
    Empty,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Ok(Command::Empty),
        "start" => {
            let (minutes, task) = match rest.split_once(char::is_whitespace) {
                Some((minutes, task)) => (minutes, task.trim()),
                None => (rest, ""),
            };
            let minutes = minutes
                .parse::<u32>()
                .map_err(|_| "usage: start <minutes> <task>".to_string())?;
            Ok(Command::Start {
                minutes,
                task: task.to_string(),
            })
        }
        "stop" | "interrupt" => Ok(Command::Stop),
        "status" => Ok(Command::Status),
        "history" => Ok(Command::History),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

pub fn run(engine: &CronosEngine) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "{}", status_line(engine))?;
    writeln!(stdout, "Type 'help' for commands.")?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(stdout, "{}", message)?;
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Help => writeln!(stdout, "{}", HELP)?,
            Command::Quit => break,
            Command::Status => writeln!(stdout, "{}", status_line(engine))?,
            Command::History => writeln!(
                stdout,
                "{}",
                report::render_history(&engine.history(HistoryOrder::NewestFirst), Utc::now())
            )?,
            Command::Stop => match engine.interrupt_cycle()? {
                Some(cycle) => writeln!(stdout, "Interrupted '{}'.", cycle.task)?,
                None => writeln!(stdout, "No active cycle.")?,
            },
            Command::Start { minutes, task } => {
                if let Some(active) = engine.active_cycle() {
                    writeln!(
                        stdout,
                        "'{}' is still running. Stop it first.",
                        active.task
                    )?;
                    continue;
                }
                let issues = validate_new_cycle(&task, minutes);
                if !issues.is_empty() {
                    for issue in issues {
                        writeln!(stdout, "{}: {}", issue.field(), issue.message())?;
                    }
                    continue;
                }
                engine.start_cycle(&task, minutes)?;
                writeln!(stdout, "Started '{}' for {} minutes.", task.trim(), minutes)?;
            }
        }
    }

    Ok(())
}

fn status_line(engine: &CronosEngine) -> String {
    match engine.refresh() {
        TickOutcome::Running(_) | TickOutcome::Stale => {
            report::render_status(engine.active_cycle().as_ref(), Utc::now())
        }
        TickOutcome::Finished(_) => "Cycle finished.".to_string(),
        TickOutcome::Idle => match engine.history(HistoryOrder::NewestFirst).first() {
            Some(last) => format!(
                "No active cycle. Last: '{}' ({}).",
                last.task,
                last.status().as_str()
            ),
            None => "No active cycle.".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_with_multi_word_task() {
        assert_eq!(
            parse_command("start 25 Write the quarterly report"),
            Ok(Command::Start {
                minutes: 25,
                task: "Write the quarterly report".to_string()
            })
        );
    }

    #[test]
    fn parses_start_without_task_for_validation_to_reject() {
        assert_eq!(
            parse_command("start 25"),
            Ok(Command::Start {
                minutes: 25,
                task: String::new()
            })
        );
    }

    #[test]
    fn rejects_non_numeric_minutes() {
        assert!(parse_command("start soon Write").is_err());
    }

    #[test]
    fn parses_simple_commands_case_insensitively() {
        assert_eq!(parse_command("STOP"), Ok(Command::Stop));
        assert_eq!(parse_command("  status "), Ok(Command::Status));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
        assert_eq!(parse_command(""), Ok(Command::Empty));
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = parse_command("pause").unwrap_err();
        assert!(err.contains("pause"));
    }
}
