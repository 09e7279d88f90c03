//! Post-processing applied to raw extracted units.

use super::unit::TextUnit;

/// Drop units whose text contains any of `markers`.
///
/// Archive toolbars and analytics snippets leak into page text. Empty markers
/// are ignored so a stray `""` in configuration cannot wipe the whole page.
#[must_use]
pub fn filter_noise(units: Vec<TextUnit>, markers: &[String]) -> Vec<TextUnit> {
    let markers: Vec<&str> = markers
        .iter()
        .map(String::as_str)
        .filter(|m| !m.is_empty())
        .collect();
    if markers.is_empty() {
        return units;
    }

    units
        .into_iter()
        .filter(|unit| !markers.iter().any(|m| unit.text.contains(m)))
        .collect()
}

/// Clamp depths so the first unit sits at 0 and each following unit is at
/// most one level deeper than its predecessor. Shallower jumps are kept.
#[must_use]
pub fn normalize_depths(mut units: Vec<TextUnit>) -> Vec<TextUnit> {
    let mut previous: Option<usize> = None;
    for unit in &mut units {
        let depth = match previous {
            None => 0,
            Some(prev) => unit.depth.min(prev + 1),
        };
        unit.depth = depth;
        previous = Some(depth);
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(depths: &[usize]) -> Vec<TextUnit> {
        depths
            .iter()
            .enumerate()
            .map(|(i, &d)| TextUnit::new(d, format!("line {i}")))
            .collect()
    }

    fn depths(units: &[TextUnit]) -> Vec<usize> {
        units.iter().map(|u| u.depth).collect()
    }

    #[test]
    fn clamps_jumps_and_keeps_returns() {
        let normalized = normalize_depths(units(&[0, 3, 1, 5]));
        assert_eq!(depths(&normalized), vec![0, 1, 1, 2]);

        let normalized = normalize_depths(units(&[4, 4, 9, 2, 0]));
        assert_eq!(depths(&normalized), vec![0, 1, 2, 2, 0]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(normalize_depths(Vec::new()).is_empty());
    }

    #[test]
    fn noise_filter_drops_marked_units() {
        let input = vec![
            TextUnit::line("keep me"),
            TextUnit::line("var WB$wombat_assign = 1"),
            TextUnit::line("CDC_POST=1 tracking"),
            TextUnit::line("also kept"),
        ];
        let markers = vec!["WB$wombat".to_string(), "CDC_POST=".to_string()];
        let kept = filter_noise(input, &markers);
        let texts: Vec<_> = kept.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["keep me", "also kept"]);
    }

    #[test]
    fn empty_marker_is_ignored() {
        let input = vec![TextUnit::line("a"), TextUnit::line("b")];
        assert_eq!(filter_noise(input, &[String::new()]).len(), 2);
    }
}
