//! Text views of a grid world and per-cell driver data.
//!
//! Every view is row-major with one line per grid row. Cells are six
//! characters wide and rows are separated by a line of dashes.

use std::collections::HashMap;
use std::io;

use ndarray::Array2;

use crate::environment::{GridWorld, Movement, Pos};
use crate::error::{GridError, Result};

const BLANK: &str = "     |";

fn separator(out: &mut String, width: usize) {
    out.push_str(&"------".repeat(width));
    out.push('\n');
}

fn number(out: &mut String, value: f32) {
    if value >= 0.0 {
        out.push_str(&format!(" {:.2}|", value));
    } else {
        out.push_str(&format!("{:.2}|", value));
    }
}

fn marker(out: &mut String, mark: char) {
    out.push_str(&format!("  {}  |", mark));
}

impl GridWorld {
    fn check_shape(&self, dim: (usize, usize)) -> Result<()> {
        let expected = (self.height(), self.width());
        if dim != expected {
            return Err(GridError::ShapeMismatch { expected, actual: dim });
        }
        Ok(())
    }

    /// Terminal and obstacle cells carry no driver data.
    fn is_blank(&self, pos: Pos) -> bool {
        self.is_terminal(pos) || self.is_obstacle(pos)
    }

    /// Renders `cell` for every position, row by row.
    fn render_rows<F>(&self, out: &mut String, mut cell: F)
    where
        F: FnMut(&mut String, Pos),
    {
        for row in 0..self.height() {
            separator(out, self.width());
            for col in 0..self.width() {
                cell(out, Pos::new(row, col));
            }
            out.push('\n');
        }
    }

    /// Layout map: `s` start, `x` obstacle, `t` target, `a` avoid.
    pub fn format_grid(&self) -> String {
        let mut out = String::new();
        self.render_rows(&mut out, |out, pos| {
            if pos == self.starting_position() {
                marker(out, 's');
            } else if self.is_obstacle(pos) {
                marker(out, 'x');
            } else if pos == self.target() {
                marker(out, 't');
            } else if pos == self.avoid() {
                marker(out, 'a');
            } else {
                out.push_str(BLANK);
            }
        });
        separator(&mut out, self.width());
        out.push('\n');
        out
    }

    pub fn print_grid(&self) {
        print!("{}", self.format_grid());
    }

    pub fn format_grid_rewards(&self) -> String {
        let mut out = String::new();
        self.render_rows(&mut out, |out, pos| number(out, self.reward(pos)));
        out.push('\n');
        out
    }

    pub fn print_grid_rewards(&self) {
        print!("{}", self.format_grid_rewards());
    }

    /// Value estimates indexed `[[row, col]]`, as produced by a value
    /// iteration driver.
    pub fn format_state_values(&self, values: &Array2<f32>) -> Result<String> {
        self.check_shape(values.dim())?;
        let mut out = String::new();
        self.render_rows(&mut out, |out, pos| {
            if self.is_blank(pos) {
                out.push_str(BLANK);
            } else {
                number(out, values[[pos.row, pos.col]]);
            }
        });
        out.push('\n');
        Ok(out)
    }

    pub fn print_state_values(&self, values: &Array2<f32>) -> Result<()> {
        print!("{}", self.format_state_values(values)?);
        Ok(())
    }

    /// Action label per cell. Cells missing from `policy` show `?`.
    pub fn format_policy(&self, policy: &HashMap<Pos, Movement>) -> String {
        let mut out = String::new();
        self.render_rows(&mut out, |out, pos| {
            if self.is_blank(pos) {
                out.push_str(BLANK);
            } else {
                marker(out, policy.get(&pos).map_or('?', |m| m.label()));
            }
        });
        out.push('\n');
        out
    }

    pub fn print_policy(&self, policy: &HashMap<Pos, Movement>) {
        print!("{}", self.format_policy(policy));
    }

    /// Share of all recorded visits spent in each cell.
    pub fn format_state_visits(&self, visits: &Array2<u64>) -> Result<String> {
        self.check_shape(visits.dim())?;
        let total = visits.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
        let mut out = format!("Total states visited: {}\n", total);
        self.render_rows(&mut out, |out, pos| {
            if self.is_blank(pos) {
                out.push_str(BLANK);
            } else if total == 0 {
                number(out, 0.0);
            } else {
                number(out, visits[[pos.row, pos.col]] as f32 / total as f32);
            }
        });
        out.push('\n');
        Ok(out)
    }

    pub fn print_state_visits(&self, visits: &Array2<u64>) -> Result<()> {
        print!("{}", self.format_state_visits(visits)?);
        Ok(())
    }

    /// Writes one `row,col,kind,reward` record per cell.
    pub fn write_rewards_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["row", "col", "kind", "reward"])?;
        for pos in self.iter_all_coordinates() {
            let kind = if pos == self.target() {
                "target"
            } else if pos == self.avoid() {
                "avoid"
            } else if self.is_obstacle(pos) {
                "obstacle"
            } else if pos == self.starting_position() {
                "start"
            } else {
                "open"
            };
            wtr.write_record(&[
                pos.row.to_string(),
                pos.col.to_string(),
                kind.to_string(),
                self.reward(pos).to_string(),
            ])?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
