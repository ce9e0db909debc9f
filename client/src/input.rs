use ttt_common::games::tictactoe::CELL_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// Zero-based cell index.
    Place(usize),
    Reset,
    Quit,
}

/// Cells are typed as 1-9, matching the numbers drawn on empty cells.
pub fn parse_command(line: &str) -> Result<ClientCommand, String> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(ClientCommand::Quit),
        "r" | "reset" | "new" => return Ok(ClientCommand::Reset),
        _ => {}
    }

    let cell: usize = trimmed
        .parse()
        .map_err(|_| format!("Unknown command '{}'", trimmed))?;
    if cell == 0 || cell > CELL_COUNT {
        return Err(format!("Cell must be between 1 and {}", CELL_COUNT));
    }
    Ok(ClientCommand::Place(cell - 1))
}
