//! Fuzzy ranking of prompts against the picker's search query.
//!
//! Ranking works in tiers: an exact name beats a prefix, a prefix beats a
//! word start, and so on down to a loose in-order character match. Accents
//! are ignored on both sides, so "resume" finds "Résumé". Within a tier,
//! names sort by base letters, then accents, then lowercase before uppercase,
//! then by catalog position.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use super::Prompt;

const CASE_SENSITIVE_EQUAL: f64 = 7.0;
const EQUAL: f64 = 6.0;
const STARTS_WITH: f64 = 5.0;
const WORD_STARTS_WITH: f64 = 4.0;
const CONTAINS: f64 = 3.0;
const ACRONYM: f64 = 2.0;
const MATCHES: f64 = 1.0;
const NO_MATCH: f64 = 0.0;

/// Filter and rank `catalog` by how well each prompt name matches `query`.
///
/// An empty query returns the catalog as-is, in catalog order.
pub fn filter_prompts(catalog: &[Prompt], query: &str) -> Vec<Prompt> {
    if query.is_empty() {
        return catalog.to_vec();
    }

    let mut ranked: Vec<(usize, f64)> = catalog
        .iter()
        .enumerate()
        .filter_map(|(idx, p)| {
            let score = rank(&p.name, query);
            (score >= MATCHES).then_some((idx, score))
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| compare_names(&catalog[a.0].name, &catalog[b.0].name))
            .then_with(|| a.0.cmp(&b.0))
    });

    ranked
        .into_iter()
        .map(|(idx, _)| catalog[idx].clone())
        .collect()
}

/// Score a single name against the query. Zero means no match.
fn rank(name: &str, query: &str) -> f64 {
    let name = strip_accents(name);
    let query = strip_accents(query);

    if query.chars().count() > name.chars().count() {
        return NO_MATCH;
    }
    if name == query {
        return CASE_SENSITIVE_EQUAL;
    }

    let name = name.to_lowercase();
    let query = query.to_lowercase();

    if name == query {
        return EQUAL;
    }
    if name.starts_with(&query) {
        return STARTS_WITH;
    }
    if name.contains(&format!(" {query}")) {
        return WORD_STARTS_WITH;
    }
    if name.contains(&query) {
        return CONTAINS;
    }
    if query.chars().count() == 1 {
        return NO_MATCH;
    }
    if acronym(&name).contains(&query) {
        return ACRONYM;
    }
    closeness(&name, &query)
}

/// Drop combining diacritical marks (U+0300..U+036F) after canonical
/// decomposition. Kana voicing marks live outside that block and survive.
fn strip_accents(s: &str) -> String {
    s.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .nfc()
        .collect()
}

/// Tie-break order for equally ranked names: base letters first, then
/// accents, then case with lowercase sorting before uppercase.
fn compare_names(a: &str, b: &str) -> Ordering {
    let (base_a, base_b) = (strip_accents(a).to_lowercase(), strip_accents(b).to_lowercase());
    base_a
        .cmp(&base_b)
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| {
            let case = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();
            case(a).cmp(&case(b))
        })
}

/// First character of every word, splitting on spaces and hyphens
fn acronym(name: &str) -> String {
    name.split(' ')
        .flat_map(|word| word.split('-'))
        .filter_map(|part| part.chars().next())
        .collect()
}

/// Every query char must appear in order. Tighter spreads score higher,
/// always strictly between MATCHES and ACRONYM.
fn closeness(name: &str, query: &str) -> f64 {
    let haystack: Vec<char> = name.chars().collect();
    let mut from = 0;
    let mut first = None;
    let mut last = 0;

    for qc in query.chars() {
        match haystack[from..].iter().position(|&c| c == qc) {
            Some(offset) => {
                let pos = from + offset;
                first.get_or_insert(pos);
                last = pos;
                from = pos + 1;
            }
            None => return NO_MATCH,
        }
    }

    match first {
        Some(first) if last > first => MATCHES + 1.0 / (last - first) as f64,
        _ => NO_MATCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> Vec<Prompt> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Prompt::new(format!("p{i}"), *n, format!("template {n}")))
            .collect()
    }

    fn names(prompts: &[Prompt]) -> Vec<&str> {
        prompts.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_golden_alpha_beta_alba() {
        let prompts = catalog(&["Alpha", "Beta", "Alba"]);
        let filtered = filter_prompts(&prompts, "al");
        assert_eq!(names(&filtered), vec!["Alba", "Alpha"]);
    }

    #[test]
    fn test_empty_query_keeps_catalog_order() {
        let prompts = catalog(&["Zeta", "Alpha", "Mu"]);
        assert_eq!(filter_prompts(&prompts, ""), prompts);
    }

    #[test]
    fn test_tiers_order_results() {
        let prompts = catalog(&["Contrast", "Translate", "English Translator"]);
        let filtered = filter_prompts(&prompts, "tr");
        assert_eq!(names(&filtered), vec!["Translate", "English Translator", "Contrast"]);
    }

    #[test]
    fn test_case_sensitive_equal_beats_equal() {
        let prompts = catalog(&["summarize", "Summarize"]);
        let filtered = filter_prompts(&prompts, "Summarize");
        assert_eq!(names(&filtered), vec!["Summarize", "summarize"]);
    }

    #[test]
    fn test_acronym_and_closeness() {
        assert_eq!(rank("Write Unit Tests", "wut"), ACRONYM);
        assert_eq!(rank("Explain Code", "ec"), ACRONYM);
        assert_eq!(rank("Round-Trip Check", "rtc"), ACRONYM);

        // p at 0, r at 1, f at 4
        assert!((rank("Proofreader", "prf") - 1.25).abs() < f64::EPSILON);
        // tighter spread ranks higher
        assert!(rank("Proofreader", "prf") > rank("Summarize", "smz"));
    }

    #[test]
    fn test_no_match_cases() {
        assert_eq!(rank("Hi", "Hii"), NO_MATCH);
        assert_eq!(rank("Beta", "al"), NO_MATCH);
        // single characters stop at the contains tier
        assert_eq!(rank("Beta", "z"), NO_MATCH);
        assert_eq!(rank("Summarize", "zs"), NO_MATCH);

        let prompts = catalog(&["Alpha", "Beta"]);
        assert!(filter_prompts(&prompts, "xyz").is_empty());
    }

    #[test]
    fn test_accents_are_ignored() {
        let prompts = catalog(&["Résumé Writer", "Café", "Cafe Menu"]);
        assert_eq!(names(&filter_prompts(&prompts, "resume")), vec!["Résumé Writer"]);
        assert_eq!(names(&filter_prompts(&prompts, "cafe")), vec!["Café", "Cafe Menu"]);
        // accented query against a plain name
        assert_eq!(names(&filter_prompts(&prompts, "Menú")), vec!["Cafe Menu"]);
        assert_eq!(rank("Café", "Cafe"), CASE_SENSITIVE_EQUAL);
        // kana voicing marks are part of the letter, not an accent
        assert_eq!(rank("ガイド", "カイド"), NO_MATCH);
    }

    #[test]
    fn test_lowercase_sorts_before_uppercase_on_ties() {
        let prompts = catalog(&["Summarize", "summarize"]);
        let filtered = filter_prompts(&prompts, "sum");
        assert_eq!(filtered[0].name, "summarize");
        assert_eq!(filtered[1].name, "Summarize");

        assert_eq!(compare_names("resume", "résumé"), Ordering::Less);
        assert_eq!(compare_names("résumé", "Resume"), Ordering::Greater);
        assert_eq!(compare_names("Same", "Same"), Ordering::Equal);
    }

    #[test]
    fn test_ties_fall_back_to_name_then_catalog_order() {
        let prompts = catalog(&["Summarize", "Proofreader", "English Translator"]);
        let filtered = filter_prompts(&prompts, "r");
        assert_eq!(names(&filtered), vec!["English Translator", "Proofreader", "Summarize"]);

        let dupes = vec![
            Prompt::new("a", "Same", "first"),
            Prompt::new("b", "Same", "second"),
        ];
        let filtered = filter_prompts(&dupes, "sa");
        assert_eq!(filtered[0].id, "a");
        assert_eq!(filtered[1].id, "b");
    }
}
