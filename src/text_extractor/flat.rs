//! Flat extraction: one trimmed, depth-0 unit per line.

use super::unit::TextUnit;

/// Characters that end a line, besides `\r\n`
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split on line boundaries and trim each line
///
/// Besides `\n`, `\r\n` and a lone `\r`, vertical tab, form feed, the
/// file/group/record separators, NEL and the Unicode line and paragraph
/// separators all end a line.
///
/// Blank lines are kept so line indices stay aligned with the source text.
/// A trailing line terminator does not produce an extra empty unit.
#[must_use]
pub fn extract_lines(text: &str) -> Vec<TextUnit> {
    let mut units = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.char_indices().find(|(_, c)| LINE_BREAKS.contains(c)) {
            Some((pos, brk)) => {
                units.push(TextUnit::line(rest[..pos].trim()));
                let skip = if rest[pos..].starts_with("\r\n") {
                    2
                } else {
                    brk.len_utf8()
                };
                rest = &rest[pos + skip..];
            }
            None => {
                units.push(TextUnit::line(rest.trim()));
                rest = "";
            }
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(units: &[TextUnit]) -> Vec<&str> {
        units.iter().map(|u| u.text.as_str()).collect()
    }

    #[test]
    fn handles_all_line_terminators() {
        let units = extract_lines("a\r\nb\rc\nd");
        assert_eq!(texts(&units), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn splits_on_control_and_unicode_separators() {
        let units = extract_lines("a\x0bb\x0cc\x1cd\x1de\x1ef\u{85}g\u{2028}h\u{2029}i");
        assert_eq!(
            texts(&units),
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]
        );
        assert_eq!(texts(&extract_lines("x\u{2029}")), vec!["x"]);
        assert_eq!(texts(&extract_lines("x\t y")), vec!["x\t y"]);
    }

    #[test]
    fn trailing_terminator_adds_no_unit() {
        assert_eq!(texts(&extract_lines("a\nb\n")), vec!["a", "b"]);
        assert!(extract_lines("").is_empty());
    }

    #[test]
    fn blank_lines_are_preserved_and_trimmed() {
        assert_eq!(texts(&extract_lines("  a  \n \t \n b")), vec!["a", "", "b"]);
    }
}
