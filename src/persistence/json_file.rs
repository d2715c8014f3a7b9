// src/persistence/json_file.rs
//! JSON-lines command log: one serialized `Command` per line.
use log::debug;
use serde_json::{from_str, to_string};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::Path;

use crate::domain::commands::Command;
use crate::domain::core::Errors;

/// A missing log is an empty history.
pub fn read_commands<P: AsRef<Path>>(path: P) -> Result<Vec<Command>, Errors> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Errors::Storage(format!("Failed to open command log: {}", e))),
    };
    let reader = BufReader::new(file);

    let mut commands = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Errors::Storage(format!("Failed to read line: {}", e)))?;
        if line.trim().is_empty() {
            continue;
        }
        let command: Command = from_str(&line).map_err(|e| {
            Errors::Storage(format!("Failed to parse command on line {}: {}", number + 1, e))
        })?;
        commands.push(command);
    }

    Ok(commands)
}

pub fn append_command<P: AsRef<Path>>(path: P, command: &Command) -> Result<(), Errors> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| Errors::Storage(format!("Failed to open command log for writing: {}", e)))?;

    let json = to_string(command)
        .map_err(|e| Errors::Storage(format!("Failed to serialize command: {}", e)))?;

    writeln!(file, "{}", json)
        .map_err(|e| Errors::Storage(format!("Failed to write to command log: {}", e)))?;
    debug!("appended {} command to log", command.name());

    Ok(())
}
