//! Duplicate-safe destination naming
//!
//! Every non-blank requested name gets a 1-based occurrence suffix inserted
//! before its extension, so `a.mp4, a.mp4, b.txt` becomes
//! `a-1.mp4, a-2.mp4, b-1.txt`. Singletons are numbered too, which keeps
//! names stable when more rows with the same name are appended later.
//! Blank names opt out and stay blank.

use std::collections::HashMap;

/// Aggregate numbers reported after a run. Never used for control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupeStats {
    /// Rows seen, including blank ones
    pub total: usize,
    /// Distinct non-blank requested names
    pub distinct: usize,
    /// Requested names occurring more than once
    pub duplicated: usize,
    /// Rows with a blank requested name
    pub blank: usize,
}

/// How one requested name was expanded, for run summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameGroup {
    pub requested: String,
    pub occurrences: usize,
}

/// Result of disambiguating one ordered sequence of names
#[derive(Debug, Clone, Default)]
pub struct Disambiguation {
    /// Final name per input position; blank for opted-out rows
    pub final_names: Vec<String>,
    pub stats: DedupeStats,
    /// Requested names in first-seen order with their occurrence counts
    pub groups: Vec<NameGroup>,
}

/// Split a name into `(base, extension)` at the last `.`.
///
/// The extension keeps its leading dot; a name without a dot has an empty
/// extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Name given to the `occurrence`-th (1-based) copy of `requested`
pub fn numbered_name(requested: &str, occurrence: usize) -> String {
    let (base, extension) = split_extension(requested);
    format!("{}-{}{}", base, occurrence, extension)
}

/// Assign a unique final name to every requested name, in order.
///
/// Names are trimmed before comparison, so `" a.mp4"` and `"a.mp4"` count as
/// the same name. The output has the same length and order as the input.
pub fn disambiguate<I, S>(requested: I) -> Disambiguation
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<NameGroup> = Vec::new();
    let mut final_names = Vec::new();
    let mut blank = 0;

    for name in requested {
        let name = name.as_ref().trim();
        if name.is_empty() {
            blank += 1;
            final_names.push(String::new());
            continue;
        }

        let counter = counters.entry(name.to_string()).or_insert(0);
        *counter += 1;
        if *counter == 1 {
            groups.push(NameGroup {
                requested: name.to_string(),
                occurrences: 0,
            });
        }
        final_names.push(numbered_name(name, *counter));
    }

    for group in &mut groups {
        group.occurrences = counters.get(&group.requested).copied().unwrap_or(0);
    }

    let stats = DedupeStats {
        total: final_names.len(),
        distinct: groups.len(),
        duplicated: groups.iter().filter(|g| g.occurrences > 1).count(),
        blank,
    };

    tracing::debug!(
        total = stats.total,
        distinct = stats.distinct,
        duplicated = stats.duplicated,
        blank = stats.blank,
        "Disambiguated requested names"
    );

    Disambiguation {
        final_names,
        stats,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_duplicates_are_numbered_in_order() {
        let result = disambiguate(["a.mp4", "a.mp4", "b.txt"]);
        assert_eq!(result.final_names, vec!["a-1.mp4", "a-2.mp4", "b-1.txt"]);
    }

    #[test]
    fn test_blank_names_opt_out() {
        let result = disambiguate(["", "   ", "a.mp4"]);
        assert_eq!(result.final_names, vec!["", "", "a-1.mp4"]);
        assert_eq!(result.stats.blank, 2);
        assert_eq!(result.stats.distinct, 1);
    }

    #[test]
    fn test_interleaved_occurrences() {
        let result = disambiguate(["x.wav", "y.wav", "x.wav", "y.wav", "x.wav"]);
        assert_eq!(
            result.final_names,
            vec!["x-1.wav", "y-1.wav", "x-2.wav", "y-2.wav", "x-3.wav"]
        );
    }

    #[test]
    fn test_whitespace_is_trimmed_before_counting() {
        let result = disambiguate([" a.mp4", "a.mp4 "]);
        assert_eq!(result.final_names, vec!["a-1.mp4", "a-2.mp4"]);
    }

    #[test]
    fn test_extension_split_edge_cases() {
        assert_eq!(split_extension("song.mp3"), ("song", ".mp3"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".bashrc"), ("", ".bashrc"));
        assert_eq!(split_extension("trailing."), ("trailing", "."));

        assert_eq!(numbered_name("archive.tar.gz", 2), "archive.tar-2.gz");
        assert_eq!(numbered_name("README", 1), "README-1");
        assert_eq!(numbered_name(".bashrc", 1), "-1.bashrc");
    }

    #[test]
    fn test_final_names_are_unique() {
        let input = [
            "a.mp4", "a.mp4", "a-1.mp4", "b", "b", "b.", "a.mp4", "", "a-1.mp4", "c.d.e",
        ];
        let result = disambiguate(input);
        let non_blank: Vec<&String> = result.final_names.iter().filter(|n| !n.is_empty()).collect();
        let unique: HashSet<&String> = non_blank.iter().copied().collect();
        assert_eq!(unique.len(), non_blank.len());
    }

    #[test]
    fn test_nth_occurrence_formula() {
        let input = ["clip.mov", "other.mov", "clip.mov", "clip.mov"];
        let result = disambiguate(input);
        let mut seen = 0;
        for (requested, final_name) in input.iter().zip(&result.final_names) {
            if *requested == "clip.mov" {
                seen += 1;
                assert_eq!(final_name, &format!("clip-{}.mov", seen));
            }
        }
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_rerun_is_identical() {
        let input = vec!["a.mp4", "b.mp4", "a.mp4", ""];
        let first = disambiguate(&input);
        let second = disambiguate(&input);
        assert_eq!(first.final_names, second.final_names);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_stats_and_groups() {
        let result = disambiguate(["a.mp4", "b.mp4", "a.mp4", "", "c.mp4", "a.mp4"]);
        assert_eq!(
            result.stats,
            DedupeStats {
                total: 6,
                distinct: 3,
                duplicated: 1,
                blank: 1,
            }
        );
        assert_eq!(
            result.groups,
            vec![
                NameGroup { requested: "a.mp4".into(), occurrences: 3 },
                NameGroup { requested: "b.mp4".into(), occurrences: 1 },
                NameGroup { requested: "c.mp4".into(), occurrences: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let result = disambiguate(Vec::<String>::new());
        assert!(result.final_names.is_empty());
        assert_eq!(result.stats, DedupeStats::default());
    }
}
