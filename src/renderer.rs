use std::io::Write;

use crate::error::RenderError;

/// Cells per row of the standard display.
pub const DEFAULT_WIDTH: usize = 32;

const RESET: &str = "\x1b[0m";

/// Visual category of a memory byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Swatch {
    Black,
    Red,
    Green,
    Yellow,
    Purple,
    Cyan,
    /// The highlight swatch, reserved for byte 255.
    White,
}

impl Swatch {
    pub const ALL: [Swatch; 7] = [
        Swatch::Black,
        Swatch::Red,
        Swatch::Green,
        Swatch::Yellow,
        Swatch::Purple,
        Swatch::Cyan,
        Swatch::White,
    ];

    /// Look up the swatch for a byte. Only 0..=5 and 255 are mapped.
    pub fn from_byte(value: u8) -> Option<Swatch> {
        match value {
            0 => Some(Swatch::Black),
            1 => Some(Swatch::Red),
            2 => Some(Swatch::Green),
            3 => Some(Swatch::Yellow),
            4 => Some(Swatch::Purple),
            5 => Some(Swatch::Cyan),
            255 => Some(Swatch::White),
            _ => None,
        }
    }

    /// The byte that maps to this swatch.
    pub fn byte(self) -> u8 {
        match self {
            Swatch::Black => 0,
            Swatch::Red => 1,
            Swatch::Green => 2,
            Swatch::Yellow => 3,
            Swatch::Purple => 4,
            Swatch::Cyan => 5,
            Swatch::White => 255,
        }
    }

    /// ANSI background escape.
    pub fn escape(self) -> &'static str {
        match self {
            Swatch::Black => "\x1b[40m",
            Swatch::Red => "\x1b[41m",
            Swatch::Green => "\x1b[42m",
            Swatch::Yellow => "\x1b[43m",
            Swatch::Purple => "\x1b[45m",
            Swatch::Cyan => "\x1b[46m",
            Swatch::White => "\x1b[47m",
        }
    }
}

/// What to do with a byte that has no swatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Fail the render with `RenderError::UnmappedByte`.
    #[default]
    Reject,
    /// Draw the given swatch instead.
    Substitute(Swatch),
}

/// Projects a memory slice onto a grid of colored terminal cells.
///
/// Stateless apart from its layout settings; rendering never mutates the
/// slice it is given.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    width: usize,
    unmapped: UnmappedPolicy,
}

impl Renderer {
    pub fn new(width: usize, unmapped: UnmappedPolicy) -> Result<Self, RenderError> {
        if width == 0 {
            return Err(RenderError::ZeroWidth);
        }
        Ok(Self { width, unmapped })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn swatch(&self, value: u8, offset: usize) -> Result<Swatch, RenderError> {
        match (Swatch::from_byte(value), self.unmapped) {
            (Some(s), _) => Ok(s),
            (None, UnmappedPolicy::Substitute(s)) => Ok(s),
            (None, UnmappedPolicy::Reject) => Err(RenderError::UnmappedByte { value, offset }),
        }
    }

    /// Map a slice to rows of swatches without writing anything.
    pub fn grid(&self, cells: &[u8]) -> Result<Vec<Vec<Swatch>>, RenderError> {
        cells
            .chunks(self.width)
            .enumerate()
            .map(|(row, chunk)| {
                chunk
                    .iter()
                    .enumerate()
                    .map(|(col, &b)| self.swatch(b, row * self.width + col))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }

    /// Write the grid to `out`. Each cell is its escape followed by two
    /// spaces; every row ends with a reset and a newline.
    ///
    /// The whole slice is mapped before anything is written, so a rejected
    /// byte leaves `out` untouched.
    pub fn render<W: Write>(&self, cells: &[u8], out: &mut W) -> Result<(), RenderError> {
        let grid = self.grid(cells)?;
        for row in &grid {
            for swatch in row {
                write!(out, "{}  ", swatch.escape())?;
            }
            writeln!(out, "{RESET}")?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn render_to_string(&self, cells: &[u8]) -> Result<String, RenderError> {
        let mut buf = Vec::new();
        self.render(cells, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            unmapped: UnmappedPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_bytes() {
        for s in Swatch::ALL {
            assert_eq!(Swatch::from_byte(s.byte()), Some(s));
        }
        assert_eq!(Swatch::from_byte(6), None);
        assert_eq!(Swatch::from_byte(254), None);
    }

    #[test]
    fn test_escapes_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for s in Swatch::ALL {
            assert!(seen.insert(s.escape()));
        }
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(matches!(
            Renderer::new(0, UnmappedPolicy::Reject),
            Err(RenderError::ZeroWidth)
        ));
    }

    #[test]
    fn test_grid_rows() {
        let r = Renderer::new(4, UnmappedPolicy::Reject).unwrap();
        let grid = r.grid(&[0, 1, 2, 3, 4, 5, 255]).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec![Swatch::Black, Swatch::Red, Swatch::Green, Swatch::Yellow]);
        assert_eq!(grid[1], vec![Swatch::Purple, Swatch::Cyan, Swatch::White]);
    }

    #[test]
    fn test_render_layout() {
        let r = Renderer::new(2, UnmappedPolicy::Reject).unwrap();
        let out = r.render_to_string(&[0, 255, 1]).unwrap();
        assert_eq!(
            out,
            "\x1b[40m  \x1b[47m  \x1b[0m\n\x1b[41m  \x1b[0m\n"
        );
    }

    #[test]
    fn test_render_empty() {
        let r = Renderer::default();
        assert_eq!(r.width(), DEFAULT_WIDTH);
        assert_eq!(r.render_to_string(&[]).unwrap(), "");
    }

    #[test]
    fn test_unmapped_rejected_with_offset() {
        let r = Renderer::new(32, UnmappedPolicy::Reject).unwrap();
        let mut out = Vec::new();
        let err = r.render(&[0, 0, 0, 77], &mut out).unwrap_err();
        assert!(matches!(err, RenderError::UnmappedByte { value: 77, offset: 3 }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unmapped_substituted() {
        let r = Renderer::new(8, UnmappedPolicy::Substitute(Swatch::Black)).unwrap();
        let grid = r.grid(&[9, 255]).unwrap();
        assert_eq!(grid, vec![vec![Swatch::Black, Swatch::White]]);
    }

    #[test]
    fn test_render_does_not_mutate() {
        let cells = vec![3u8; 64];
        let before = cells.clone();
        Renderer::default().render_to_string(&cells).unwrap();
        assert_eq!(cells, before);
    }
}
