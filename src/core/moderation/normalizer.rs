// Text normalization - canonicalizes a message to defeat common filter
// evasion: leetspeak substitution, character spacing and elongation.
//
// Pure string processing, no policy knowledge. The detection engine matches
// against both the normalized text and the plain lowercased text, because
// normalization is lossy in both directions.

/// Leetspeak / symbol substitutions applied during normalization.
///
/// Each substitution is applied independently per character; a character
/// produced by one substitution is never re-substituted.
const SUBSTITUTIONS: [(char, char); 9] = [
    ('@', 'a'),
    ('3', 'e'),
    ('1', 'i'),
    ('0', 'o'),
    ('5', 's'),
    ('7', 't'),
    ('4', 'a'),
    ('$', 's'),
    ('+', 't'),
];

fn substitute(c: char) -> char {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Normalize text to catch common bypasses.
///
/// Steps, in fixed order:
/// 1. Lowercase the input.
/// 2. Apply the substitution table (`b4d` -> `bad`).
/// 3. Strip all whitespace (`b a d` -> `bad`).
/// 4. Collapse runs of 3+ identical characters to one (`shiiiit` -> `shit`).
///    Runs of 1 or 2 are left untouched.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last: Option<char> = None;
    let mut run_len = 0usize;

    for c in text.chars().flat_map(|c| c.to_lowercase()).map(substitute) {
        if c.is_whitespace() {
            continue;
        }

        if last == Some(c) {
            run_len += 1;
        } else {
            last = Some(c);
            run_len = 1;
        }

        // Runs of exactly 2 survive; the third and later repeats are
        // dropped, which leaves a single instance once the pending second
        // character is unwound below.
        if run_len <= 2 {
            out.push(c);
        } else if run_len == 3 {
            // Entering collapse territory: the run reduces to one char.
            out.pop();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_input() {
        assert_eq!(normalize("BadWord"), "badword");
    }

    #[test]
    fn applies_substitution_table() {
        assert_eq!(normalize("b4dw0rd"), "badword");
        assert_eq!(normalize("$h1t"), "shit");
        assert_eq!(normalize("7e5+"), "test");
    }

    #[test]
    fn substitutions_are_not_rescanned() {
        // '4' -> 'a' directly; the produced 'a' is never fed back through
        // the table.
        assert_eq!(normalize("4"), "a");
    }

    #[test]
    fn strips_all_whitespace() {
        assert_eq!(normalize("b a d w o r d"), "badword");
        assert_eq!(normalize("bad\tword\nhere"), "badwordhere");
    }

    #[test]
    fn collapses_runs_of_three_or_more() {
        assert_eq!(normalize("shiiiit"), "shit");
        assert_eq!(normalize("nooooo"), "no");
        // Runs of exactly two are untouched.
        assert_eq!(normalize("bookkeeper"), "bookkeeper");
        assert_eq!(normalize("aa"), "aa");
        assert_eq!(normalize("aaa"), "a");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn handles_multibyte_characters() {
        assert_eq!(normalize("héllo"), "héllo");
        assert_eq!(normalize("🔥🔥🔥🔥"), "🔥");
    }

    #[test]
    fn double_application_never_grows() {
        // normalize(normalize(x)) == normalize(x) is not guaranteed in
        // general (whitespace stripping can create new 3+ runs that the
        // first pass already collapsed differently), but a second pass must
        // never produce a longer string.
        let samples = [
            "",
            "hello world",
            "b4dw0rd",
            "shiiiit",
            "b a d w o r d",
            "aa a",
            "MIXED c4$E with   spaces",
            "🔥🔥🔥 fire 🔥🔥🔥",
        ];
        for s in samples {
            let once = normalize(s);
            let twice = normalize(&once);
            assert!(
                twice.len() <= once.len(),
                "second pass grew for {:?}: {:?} -> {:?}",
                s,
                once,
                twice
            );
        }
    }
}
