//! Line parser - free-text workout lines into structured entries
//!
//! A line reads `<name> [<sets> x <reps>] [<weight>] [<unit>]`, for example
//! `bench press 3x8 75kg` or `подтягивания 5хmax`. Each phase below returns
//! its candidate matches in preference order (the name shortest first, digit
//! runs longest first) and [`parse_line`] takes the first combination that
//! consumes the whole line.

use serde::{Deserialize, Serialize};

/// Latin and Cyrillic "x" between sets and reps
const SET_SEPARATORS: [char; 2] = ['x', 'х'];

const MAX_REPS: &str = "max";
const TO_FAILURE: (&str, &str) = ("до", "отказа");

/// Kilogram spellings, tried in this order. Matched and thrown away.
const WEIGHT_UNITS: [&str; 3] = ["кг", "kg", "к"];

/// One successfully parsed workout line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub exercise: String,
    pub sets: Option<u32>,
    pub reps: Option<String>,
    pub weight: Option<f64>,
}

/// Half-open char range `[start, end)` within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    fn text(&self, line: &[char]) -> String {
        line[self.start..self.end].iter().collect()
    }
}

/// The `<sets> x <reps>` group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetsReps {
    pub sets: Span,
    pub reps: Span,
}

/// Which phase matched what, before any conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch {
    pub name: Span,
    pub sets_reps: Option<SetsReps>,
    pub weight: Option<Span>,
}

/// Parse one line. `None` for blank lines and lines outside the grammar.
pub fn parse_line(raw: &str) -> Option<ParsedLine> {
    let line: Vec<char> = raw.trim().to_lowercase().chars().collect();
    if line.is_empty() {
        return None;
    }

    let matched = match_line(&line)?;
    let name = matched.name.text(&line);

    // Sets that overflow or a weight like "1.2.3" fit the grammar but not a number.
    let (sets, reps) = match matched.sets_reps {
        Some(group) => (
            Some(group.sets.text(&line).parse::<u32>().ok()?),
            Some(group.reps.text(&line)),
        ),
        None => (None, None),
    };
    let weight = match matched.weight {
        Some(span) => Some(span.text(&line).replace(',', ".").parse::<f64>().ok()?),
        None => None,
    };

    Some(ParsedLine {
        exercise: title_case(name.trim()),
        sets,
        reps,
        weight,
    })
}

/// Parse every line of a message, dropping the ones that don't parse.
pub fn parse_message(text: &str) -> Vec<ParsedLine> {
    text.lines().filter_map(parse_line).collect()
}

/// Run the phases over an already trimmed, lower-cased line.
pub fn match_line(line: &[char]) -> Option<LineMatch> {
    for name_end in name_ends(line) {
        let after_name = skip_whitespace(line, name_end);

        let mut groups: Vec<Option<SetsReps>> =
            sets_reps_at(line, after_name).into_iter().map(Some).collect();
        groups.push(None);

        for sets_reps in groups {
            let after_group =
                skip_whitespace(line, sets_reps.map_or(after_name, |group| group.reps.end));

            let mut weights: Vec<Option<Span>> =
                weight_at(line, after_group).into_iter().map(Some).collect();
            weights.push(None);

            for weight in weights {
                let after_weight = skip_whitespace(line, weight.map_or(after_group, |w| w.end));
                let reaches_end = unit_ends(line, after_weight)
                    .into_iter()
                    .chain(std::iter::once(after_weight))
                    .any(|end| end == line.len());

                if reaches_end {
                    return Some(LineMatch {
                        name: Span::new(0, name_end),
                        sets_reps,
                        weight,
                    });
                }
            }
        }
    }

    None
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || ('а'..='я').contains(&c) || c == 'ё' || c == '-' || c.is_whitespace()
}

/// Possible ends of the exercise name, shortest first. Empty if the line
/// does not start with a name character.
pub fn name_ends(line: &[char]) -> Vec<usize> {
    let run = line.iter().take_while(|c| is_name_char(**c)).count();
    (1..=run).collect()
}

/// `<digits> x <reps>` starting at `pos`, one candidate per reps reading.
pub fn sets_reps_at(line: &[char], pos: usize) -> Vec<SetsReps> {
    let digits = run_length(line, pos, |c| c.is_ascii_digit());
    if digits == 0 {
        return Vec::new();
    }
    let sets = Span::new(pos, pos + digits);

    let separator = skip_whitespace(line, sets.end);
    if !line.get(separator).is_some_and(|c| SET_SEPARATORS.contains(c)) {
        return Vec::new();
    }

    let reps_start = skip_whitespace(line, separator + 1);
    reps_at(line, reps_start)
        .into_iter()
        .map(|reps| SetsReps { sets, reps })
        .collect()
}

/// Reps readings at `pos`: a digits-and-hyphens run (longest first), then
/// `max`, then "до отказа".
pub fn reps_at(line: &[char], pos: usize) -> Vec<Span> {
    let run = run_length(line, pos, |c| c.is_ascii_digit() || c == '-');
    let mut found: Vec<Span> = (1..=run).rev().map(|len| Span::new(pos, pos + len)).collect();

    if let Some(end) = keyword_at(line, pos, MAX_REPS) {
        found.push(Span::new(pos, end));
    }

    let (first, second) = TO_FAILURE;
    if let Some(end) = keyword_at(line, pos, first)
        && let Some(end) = keyword_at(line, skip_whitespace(line, end), second)
    {
        found.push(Span::new(pos, end));
    }

    found
}

/// Weight readings at `pos`: runs of digits, `.` and `,`, longest first.
pub fn weight_at(line: &[char], pos: usize) -> Vec<Span> {
    let run = run_length(line, pos, |c| c.is_ascii_digit() || c == '.' || c == ',');
    (1..=run).rev().map(|len| Span::new(pos, pos + len)).collect()
}

/// Ends of every weight unit spelled at `pos`.
pub fn unit_ends(line: &[char], pos: usize) -> Vec<usize> {
    WEIGHT_UNITS
        .iter()
        .filter_map(|unit| keyword_at(line, pos, unit))
        .collect()
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

fn skip_whitespace(line: &[char], pos: usize) -> usize {
    pos + run_length(line, pos, char::is_whitespace)
}

fn run_length(line: &[char], pos: usize, accept: impl Fn(char) -> bool) -> usize {
    line.get(pos..)
        .map_or(0, |rest| rest.iter().take_while(|c| accept(**c)).count())
}

fn keyword_at(line: &[char], pos: usize, word: &str) -> Option<usize> {
    let mut at = pos;
    for expected in word.chars() {
        if line.get(at) != Some(&expected) {
            return None;
        }
        at += 1;
    }
    Some(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn parsed(exercise: &str, sets: Option<u32>, reps: Option<&str>, weight: Option<f64>) -> ParsedLine {
        ParsedLine {
            exercise: exercise.to_string(),
            sets,
            reps: reps.map(str::to_string),
            weight,
        }
    }

    #[test]
    fn test_full_line_latin() {
        assert_eq!(
            parse_line("bench press 3x8 75kg"),
            Some(parsed("Bench Press", Some(3), Some("8"), Some(75.0)))
        );
    }

    #[test]
    fn test_cyrillic_unit_same_numbers() {
        let cyrillic = parse_line("squat 4x10 90кг").unwrap();
        let latin = parse_line("squat 4x10 90kg").unwrap();
        assert_eq!(cyrillic, latin);
        assert_eq!(cyrillic, parsed("Squat", Some(4), Some("10"), Some(90.0)));
    }

    #[test]
    fn test_short_cyrillic_unit() {
        assert_eq!(
            parse_line("squat 4x10 90к"),
            Some(parsed("Squat", Some(4), Some("10"), Some(90.0)))
        );
    }

    #[test]
    fn test_max_reps() {
        assert_eq!(
            parse_line("pull-ups 5xmax"),
            Some(parsed("Pull-Ups", Some(5), Some("max"), None))
        );
    }

    #[test]
    fn test_comma_decimal_without_sets() {
        assert_eq!(
            parse_line("deadlift 100,5"),
            Some(parsed("Deadlift", None, None, Some(100.5)))
        );
    }

    #[test]
    fn test_bare_number_is_weight() {
        assert_eq!(
            parse_line("bench 100"),
            Some(parsed("Bench", None, None, Some(100.0)))
        );
    }

    #[test]
    fn test_name_only() {
        for name in ["squat", "romanian deadlift", "pull-ups", "жим лежа"] {
            let line = parse_line(name).unwrap();
            assert_eq!(line.exercise, title_case(name));
            assert_eq!(line.sets, None);
            assert_eq!(line.reps, None);
            assert_eq!(line.weight, None);
        }
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("\t \n"), None);
    }

    #[test]
    fn test_input_is_trimmed_and_case_folded() {
        assert_eq!(
            parse_line("  BENCH Press 3X8 75KG  "),
            Some(parsed("Bench Press", Some(3), Some("8"), Some(75.0)))
        );
    }

    #[test]
    fn test_cyrillic_line() {
        assert_eq!(
            parse_line("Жим лежа 3х8 75кг"),
            Some(parsed("Жим Лежа", Some(3), Some("8"), Some(75.0)))
        );
    }

    #[test]
    fn test_reps_range_kept_raw() {
        assert_eq!(
            parse_line("curl 3x8-12 15"),
            Some(parsed("Curl", Some(3), Some("8-12"), Some(15.0)))
        );
    }

    #[test]
    fn test_to_failure_reps() {
        assert_eq!(
            parse_line("отжимания 3х до отказа"),
            Some(parsed("Отжимания", Some(3), Some("до отказа"), None))
        );
        assert_eq!(
            parse_line("отжимания 3хдоотказа").and_then(|l| l.reps),
            Some("доотказа".to_string())
        );
    }

    #[test]
    fn test_spaces_around_separator() {
        assert_eq!(
            parse_line("row 4 x 12 60.5 kg"),
            Some(parsed("Row", Some(4), Some("12"), Some(60.5)))
        );
    }

    #[test]
    fn test_rejects_lines_without_name() {
        assert_eq!(parse_line("3x8 75kg"), None);
        assert_eq!(parse_line("100"), None);
    }

    #[test]
    fn test_rejects_trailing_garbage() {
        assert_eq!(parse_line("bench 3x8 75kg please"), None);
        assert_eq!(parse_line("bench 3x8 75lbs"), None);
        assert_eq!(parse_line("squat #1"), None);
    }

    #[test]
    fn test_unconvertible_weight_drops_line() {
        assert_eq!(parse_line("bench 1.2.3"), None);
        assert_eq!(parse_line("bench ."), None);
    }

    #[test]
    fn test_weight_glued_to_reps() {
        // reps stop at the comma, which then starts the weight
        assert_eq!(
            parse_line("press 3x8,5"),
            Some(parsed("Press", Some(3), Some("8"), Some(0.5)))
        );
    }

    #[test]
    fn test_parse_message_skips_bad_lines() {
        let entries = parse_message("bench press 3x8 75kg\n???\nsquat 4x10 90кг");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].exercise, "Bench Press");
        assert_eq!(entries[1].exercise, "Squat");
    }

    #[test]
    fn test_parse_message_blank_lines() {
        assert!(parse_message("\n\n   \n").is_empty());
    }

    #[test]
    fn test_name_ends_lazy_order() {
        assert_eq!(name_ends(&chars("ab 3")), vec![1, 2, 3]);
        assert!(name_ends(&chars("3x8")).is_empty());
    }

    #[test]
    fn test_sets_reps_phase() {
        let line = chars("3x8-10");
        let groups = sets_reps_at(&line, 0);
        assert_eq!(groups[0].sets, Span::new(0, 1));
        assert_eq!(groups[0].reps, Span::new(2, 6));
        // shorter readings follow the greedy one
        assert_eq!(groups.last().unwrap().reps, Span::new(2, 3));
    }

    #[test]
    fn test_sets_reps_phase_needs_separator() {
        assert!(sets_reps_at(&chars("100"), 0).is_empty());
        assert!(sets_reps_at(&chars("3*8"), 0).is_empty());
    }

    #[test]
    fn test_weight_phase() {
        let line = chars("100,5kg");
        assert_eq!(weight_at(&line, 0)[0], Span::new(0, 5));
        assert!(weight_at(&line, 5).is_empty());
    }

    #[test]
    fn test_unit_phase() {
        assert_eq!(unit_ends(&chars("кг"), 0), vec![2, 1]);
        assert_eq!(unit_ends(&chars("kg"), 0), vec![2]);
        assert!(unit_ends(&chars("lb"), 0).is_empty());
    }

    #[test]
    fn test_match_line_bare_weight() {
        let line = chars("deadlift 100");
        let matched = match_line(&line).unwrap();
        assert_eq!(matched.name, Span::new(0, 8));
        assert_eq!(matched.sets_reps, None);
        assert_eq!(matched.weight, Some(Span::new(9, 12)));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("bench press"), "Bench Press");
        assert_eq!(title_case("pull-ups"), "Pull-Ups");
        assert_eq!(title_case("жим лёжа"), "Жим Лёжа");
        assert_eq!(title_case("-"), "-");
    }
}
