use crate::text::encoding::is_win_ansi;
use crate::text::Font;
use std::collections::HashMap;

/// Character width information for standard PDF fonts
/// All widths are in 1/1000 of a unit (font size 1.0)
pub struct FontMetrics {
    widths: HashMap<char, u16>,
    default_width: u16,
}

impl FontMetrics {
    fn new(default_width: u16) -> Self {
        Self {
            widths: HashMap::new(),
            default_width,
        }
    }

    fn with_widths(mut self, widths: &[(char, u16)]) -> Self {
        for &(ch, width) in widths {
            self.widths.insert(ch, width);
        }
        self
    }

    pub fn char_width(&self, ch: char) -> u16 {
        self.widths.get(&ch).copied().unwrap_or(self.default_width)
    }
}

lazy_static::lazy_static! {
    static ref FONT_METRICS: HashMap<Font, FontMetrics> = {
        let mut metrics = HashMap::new();

        // Helvetica
        metrics.insert(Font::Helvetica, FontMetrics::new(556).with_widths(&[
            (' ', 278), ('!', 278), ('"', 355), ('#', 556), ('$', 556), ('%', 889),
            ('&', 667), ('\'', 191), ('(', 333), (')', 333), ('*', 389), ('+', 584),
            (',', 278), ('-', 333), ('.', 278), ('/', 278), ('0', 556), ('1', 556),
            ('2', 556), ('3', 556), ('4', 556), ('5', 556), ('6', 556), ('7', 556),
            ('8', 556), ('9', 556), (':', 278), (';', 278), ('<', 584), ('=', 584),
            ('>', 584), ('?', 556), ('@', 1015), ('A', 667), ('B', 667), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 722), ('I', 278),
            ('J', 500), ('K', 667), ('L', 556), ('M', 833), ('N', 722), ('O', 778),
            ('P', 667), ('Q', 778), ('R', 722), ('S', 667), ('T', 611), ('U', 722),
            ('V', 667), ('W', 944), ('X', 667), ('Y', 667), ('Z', 611), ('[', 278),
            ('\\', 278), (']', 278), ('^', 469), ('_', 556), ('`', 333), ('a', 556),
            ('b', 556), ('c', 500), ('d', 556), ('e', 556), ('f', 278), ('g', 556),
            ('h', 556), ('i', 222), ('j', 222), ('k', 500), ('l', 222), ('m', 833),
            ('n', 556), ('o', 556), ('p', 556), ('q', 556), ('r', 333), ('s', 500),
            ('t', 278), ('u', 556), ('v', 500), ('w', 722), ('x', 500), ('y', 500),
            ('z', 500), ('{', 334), ('|', 260), ('}', 334), ('~', 584),
        ]).with_widths(&[
            ('á', 556), ('à', 556), ('â', 556), ('ä', 556), ('ã', 556), ('å', 556),
            ('é', 556), ('è', 556), ('ê', 556), ('ë', 556), ('í', 278), ('ì', 278),
            ('î', 278), ('ï', 278), ('ó', 556), ('ò', 556), ('ô', 556), ('ö', 556),
            ('õ', 556), ('ú', 556), ('ù', 556), ('û', 556), ('ü', 556), ('ñ', 556),
            ('ç', 500), ('ý', 500), ('ÿ', 500), ('Á', 667), ('À', 667), ('Â', 667),
            ('Ä', 667), ('Ã', 667), ('Å', 667), ('É', 667), ('È', 667), ('Ê', 667),
            ('Ë', 667), ('Í', 278), ('Ì', 278), ('Î', 278), ('Ï', 278), ('Ó', 778),
            ('Ò', 778), ('Ô', 778), ('Ö', 778), ('Õ', 778), ('Ú', 722), ('Ù', 722),
            ('Û', 722), ('Ü', 722), ('Ñ', 722), ('Ç', 722), ('¿', 611), ('¡', 333),
            ('°', 400), ('º', 365), ('ª', 370), ('·', 278), ('«', 556), ('»', 556),
            ('•', 350), ('–', 556), ('—', 1000), ('‘', 222), ('’', 222), ('“', 333),
            ('”', 333), ('…', 1000), ('€', 556),
        ]));

        // Helvetica Bold
        metrics.insert(Font::HelveticaBold, FontMetrics::new(611).with_widths(&[
            (' ', 278), ('!', 333), ('"', 474), ('#', 556), ('$', 556), ('%', 889),
            ('&', 722), ('\'', 238), ('(', 333), (')', 333), ('*', 389), ('+', 584),
            (',', 278), ('-', 333), ('.', 278), ('/', 278), ('0', 556), ('1', 556),
            ('2', 556), ('3', 556), ('4', 556), ('5', 556), ('6', 556), ('7', 556),
            ('8', 556), ('9', 556), (':', 333), (';', 333), ('<', 584), ('=', 584),
            ('>', 584), ('?', 611), ('@', 975), ('A', 722), ('B', 722), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 722), ('I', 278),
            ('J', 556), ('K', 722), ('L', 611), ('M', 833), ('N', 722), ('O', 778),
            ('P', 667), ('Q', 778), ('R', 722), ('S', 667), ('T', 611), ('U', 722),
            ('V', 667), ('W', 944), ('X', 667), ('Y', 667), ('Z', 611), ('[', 333),
            ('\\', 278), (']', 333), ('^', 584), ('_', 556), ('`', 333), ('a', 556),
            ('b', 611), ('c', 556), ('d', 611), ('e', 556), ('f', 333), ('g', 611),
            ('h', 611), ('i', 278), ('j', 278), ('k', 556), ('l', 278), ('m', 889),
            ('n', 611), ('o', 611), ('p', 611), ('q', 611), ('r', 389), ('s', 556),
            ('t', 333), ('u', 611), ('v', 556), ('w', 778), ('x', 556), ('y', 556),
            ('z', 500), ('{', 389), ('|', 280), ('}', 389), ('~', 584),
        ]).with_widths(&[
            ('á', 556), ('à', 556), ('â', 556), ('ä', 556), ('ã', 556), ('å', 556),
            ('é', 556), ('è', 556), ('ê', 556), ('ë', 556), ('í', 278), ('ì', 278),
            ('î', 278), ('ï', 278), ('ó', 611), ('ò', 611), ('ô', 611), ('ö', 611),
            ('õ', 611), ('ú', 611), ('ù', 611), ('û', 611), ('ü', 611), ('ñ', 611),
            ('ç', 556), ('ý', 556), ('ÿ', 556), ('Á', 722), ('À', 722), ('Â', 722),
            ('Ä', 722), ('Ã', 722), ('Å', 722), ('É', 667), ('È', 667), ('Ê', 667),
            ('Ë', 667), ('Í', 278), ('Ì', 278), ('Î', 278), ('Ï', 278), ('Ó', 778),
            ('Ò', 778), ('Ô', 778), ('Ö', 778), ('Õ', 778), ('Ú', 722), ('Ù', 722),
            ('Û', 722), ('Ü', 722), ('Ñ', 722), ('Ç', 722), ('¿', 611), ('¡', 333),
            ('°', 400), ('º', 365), ('ª', 370), ('·', 278), ('«', 556), ('»', 556),
            ('•', 350), ('–', 556), ('—', 1000), ('‘', 278), ('’', 278), ('“', 500),
            ('”', 500), ('…', 1000), ('€', 556),
        ]));

        metrics
    };
}

fn metrics_for(font: Font) -> &'static FontMetrics {
    // Every `Font` variant is inserted above.
    &FONT_METRICS[&font]
}

/// Measure the width of a text string in a given font and size.
///
/// Characters without a WinAnsiEncoding code point are drawn as `?` and
/// measured as such.
pub fn measure_text(text: &str, font: Font, font_size: f64) -> f64 {
    let metrics = metrics_for(font);

    let width_units: u32 = text
        .chars()
        .map(|ch| {
            let drawn = if is_win_ansi(ch) { ch } else { '?' };
            metrics.char_width(drawn) as u32
        })
        .sum();

    (width_units as f64 / 1000.0) * font_size
}
