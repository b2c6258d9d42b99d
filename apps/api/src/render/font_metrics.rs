//! Static font-metric table for Helvetica, the report's only font.
//!
//! Character widths are in em units (relative to font size), taken from the
//! standard Helvetica AFM advance widths divided by 1000. The table covers
//! ASCII 0x20..=0x7E (95 printable characters); index = (char as usize) - 32.
//! Latin-1 characters above 0x7E fall back to `average_char_width`, which is
//! close enough for wrapping decisions.

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Layout parameters for a report page.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    pub font_size_pt: f32,
    pub line_height_pt: f32,
}

/// A4 portrait, 10 mm margins, Helvetica 12pt on a 10 mm line pitch.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width_pt: 210.0 * MM_TO_PT,
        height_pt: 297.0 * MM_TO_PT,
        margin_pt: 10.0 * MM_TO_PT,
        font_size_pt: 12.0,
        line_height_pt: 10.0 * MM_TO_PT,
    }
}

impl PageConfig {
    /// Usable text width in em units at the configured font size.
    pub fn text_width_em(&self) -> f32 {
        (self.width_pt - 2.0 * self.margin_pt) / self.font_size_pt
    }

    /// Number of text lines that fit between the top and bottom margins.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.height_pt - 2.0 * self.margin_pt;
        ((usable / self.line_height_pt).floor() as usize).max(1)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Greedy word-wrap of a single paragraph at `max_width_em`.
    ///
    /// Runs of whitespace collapse to one space. A word wider than a whole
    /// line is split by character. An empty paragraph yields one empty line
    /// so blank lines in the source survive.
    pub fn wrap(&self, paragraph: &str, max_width_em: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_w = self.measure_str(word);

            if word_w > max_width_em {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                for c in word.chars() {
                    let w = self.char_width(c);
                    if !current.is_empty() && current_width + w > max_width_em {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                    }
                    current.push(c);
                    current_width += w;
                }
                continue;
            }

            let space_w = if current.is_empty() { 0.0 } else { self.space_width };
            if !current.is_empty() && current_width + space_w + word_w > max_width_em {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += space_w + word_w;
            }
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width table
// ────────────────────────────────────────────────────────────────────────────

pub static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0     1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :     ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A     B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N     O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [     \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a     b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n     o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {     |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
