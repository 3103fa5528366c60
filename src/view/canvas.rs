use std::io::{self, Write};

use golgrid::{pos, Pos};

/// Character buffer of the screen, flushed in one go.
pub struct Canvas {
    lines: Vec<Vec<char>>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn from_screen() -> io::Result<Self> {
        let (width, height) = termion::terminal_size()?;
        Ok(Self::new(width as usize, height as usize))
    }

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            lines: vec![vec![' '; width]; height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// paints every position `f` has a character for.
    pub fn layer(&mut self, f: impl Fn(Pos) -> Option<char>) {
        for (row, line) in self.lines.iter_mut().enumerate() {
            for (col, slot) in line.iter_mut().enumerate() {
                if let Some(char) = f(pos!(row, col)) {
                    *slot = char;
                }
            }
        }
    }

    /// writes `text` from `at`, cut at the right edge.
    pub fn text(&mut self, at: Pos, text: &str) {
        let Some(line) = self.lines.get_mut(at.row) else {
            return;
        };
        for (slot, char) in line.iter_mut().skip(at.col).zip(text.chars()) {
            *slot = char;
        }
    }

    #[cfg(test)]
    pub fn line(&self, row: usize) -> String {
        self.lines.get(row).map(|line| line.iter().collect()).unwrap_or_default()
    }

    pub fn display(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", termion::clear::All)?;
        for (index, line) in self.lines.iter().enumerate() {
            let goto = termion::cursor::Goto(1, index as u16 + 1);
            let line: String = line.iter().collect();
            write!(out, "{goto}{line}")?;
        }
        out.flush()
    }
}

#[test]
fn test_layer_and_text() {
    let mut canvas = Canvas::new(4, 2);
    canvas.layer(|Pos { row, col }| (row == col).then_some('#'));
    assert_eq!(canvas.line(0), "#   ");
    assert_eq!(canvas.line(1), " #  ");
    canvas.text(pos!(1, 2), "abc");
    assert_eq!(canvas.line(1), " #ab");
    canvas.text(pos!(5, 0), "ignored");
    assert_eq!(canvas.line(5), "");
}
