//! Static glyph-width tables used to measure text without loading a font.
//!
//! Widths are in em units (multiply by the font size in px for pixels) and
//! follow the standard Helvetica / Helvetica-Bold advance widths. The
//! rasterizer may draw with a different face; the tables only need to be close
//! enough that wrapped lines and block heights land where the glyphs do.
//!
//! Tables cover ASCII 0x20..=0x7E. Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Character-width table for one weight of the sans face.
///
/// Slot layout:
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
    pub weight: FontWeight,
    widths: [f32; 95],
    /// Used for anything outside printable ASCII (dashes, bullets, accents).
    pub fallback_width: f32,
}

impl FontMetricTable {
    /// Width of `s` in em.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Width of `s` in px at `size_px`.
    pub fn measure_px(&self, s: &str, size_px: f32) -> f32 {
        self.measure_str(s) * size_px
    }

    pub fn space_width(&self) -> f32 {
        self.widths[0]
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.fallback_width
        }
    }
}

/// Returns the table for `weight`.
pub fn get_metrics(weight: FontWeight) -> &'static FontMetricTable {
    match weight {
        FontWeight::Regular => &SANS_REGULAR,
        FontWeight::Bold => &SANS_BOLD,
    }
}

static SANS_REGULAR: FontMetricTable = FontMetricTable {
    weight: FontWeight::Regular,
    widths: [
        // sp     !      "      #      $      %      &      '
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191,
        // (      )      *      +      ,      -      .      /
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    fallback_width: 0.556,
};

static SANS_BOLD: FontMetricTable = FontMetricTable {
    weight: FontWeight::Bold,
    widths: [
        // sp     !      "      #      $      %      &      '
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238,
        // (      )      *      +      ,      -      .      /
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    fallback_width: 0.611,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_cover_printable_ascii() {
        for weight in [FontWeight::Regular, FontWeight::Bold] {
            let table = get_metrics(weight);
            assert_eq!(table.weight, weight);
            assert!(table.widths.iter().all(|w| *w > 0.0 && *w < 1.1));
        }
    }

    #[test]
    fn test_measure_known_glyphs() {
        let regular = get_metrics(FontWeight::Regular);
        assert!((regular.measure_str("i") - 0.222).abs() < 1e-6);
        assert!((regular.measure_str("W") - 0.944).abs() < 1e-6);
        assert!((regular.measure_px("00", 10.0) - 11.12).abs() < 1e-4);
        assert_eq!(regular.measure_str(""), 0.0);
    }

    #[test]
    fn test_bold_is_not_narrower() {
        let text = "Software Engineer — Awesome Co";
        let regular = get_metrics(FontWeight::Regular).measure_str(text);
        let bold = get_metrics(FontWeight::Bold).measure_str(text);
        assert!(bold >= regular);
    }

    #[test]
    fn test_non_ascii_uses_fallback() {
        let regular = get_metrics(FontWeight::Regular);
        assert!((regular.measure_str("•") - regular.fallback_width).abs() < 1e-6);
        assert!((regular.measure_str("é–") - 2.0 * regular.fallback_width).abs() < 1e-6);
    }
}
