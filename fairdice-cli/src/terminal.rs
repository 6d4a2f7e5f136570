use comfy_table::{presets::UTF8_FULL, Table};
use fairdice_core::probability::WinMatrix;
use fairdice_core::{Die, GameError, Result};
use std::io::{BufRead, Write};

/// stdin/stdout binding of the engine's terminal seam.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }
}

impl fairdice_core::GameIo for Terminal {
    fn say(&mut self, line: &str) -> Result<()> {
        let mut out = std::io::stdout();
        writeln!(out, "{line}")?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        let mut out = std::io::stdout();
        write!(out, "{text}")?;
        out.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            // EOF on stdin; without this the retry loop would spin forever
            return Err(GameError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "end of input",
            )));
        }
        Ok(line)
    }

    fn show_probability_table(&mut self, dice: &[Die]) -> Result<()> {
        let table = probability_table(dice);
        let mut out = std::io::stdout();
        writeln!(out, "{table}")?;
        Ok(())
    }
}

/// Matrix of pairwise win probabilities: rows are the user's candidate die,
/// columns the opponent's, diagonal suppressed.
fn probability_table(dice: &[Die]) -> Table {
    let matrix = WinMatrix::compute(dice);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["User dice v".to_string()];
    header.extend(matrix.labels().iter().cloned());
    table.set_header(header);

    for row in 0..matrix.size() {
        let mut cells = vec![matrix.labels()[row].clone()];
        for col in 0..matrix.size() {
            cells.push(match matrix.cell(row, col) {
                Some(p) => format!("{p:.4}"),
                None => "-".to_string(),
            });
        }
        table.add_row(cells);
    }
    table
}
