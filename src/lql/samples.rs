//! Bundled LQL programs
//!
//! The sources live in `samples/` at the crate root and are embedded at build
//! time. `default` is what a fresh editor opens with.

/// A named sample program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub name: &'static str,
    pub source: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "default",
        source: include_str!("../../samples/default.lql"),
    },
    Sample {
        name: "statistics",
        source: include_str!("../../samples/statistics.lql"),
    },
    Sample {
        name: "filters",
        source: include_str!("../../samples/filters.lql"),
    },
    Sample {
        name: "sort_and_map",
        source: include_str!("../../samples/sort_and_map.lql"),
    },
    Sample {
        name: "sets",
        source: include_str!("../../samples/sets.lql"),
    },
    Sample {
        name: "arithmetic",
        source: include_str!("../../samples/arithmetic.lql"),
    },
];

pub struct Samples;

impl Samples {
    /// The program a new editor starts with
    pub fn default_program() -> &'static str {
        SAMPLES[0].source
    }

    /// Every bundled sample, default first
    pub fn all() -> &'static [Sample] {
        SAMPLES
    }

    /// Look a sample up by name, with or without the `.lql` extension
    pub fn get(name: &str) -> Option<&'static Sample> {
        let name = name.strip_suffix(".lql").unwrap_or(name);
        SAMPLES.iter().find(|sample| sample.name == name)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        SAMPLES.iter().map(|sample| sample.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lql::grammar::{classify, TokenCategory};

    #[test]
    fn test_default_program_is_first() {
        assert_eq!(Samples::all()[0].name, "default");
        assert!(Samples::default_program().starts_with("@ Example Code:"));
    }

    #[test]
    fn test_get_by_name() {
        assert_eq!(Samples::get("sets").map(|s| s.name), Some("sets"));
        assert_eq!(Samples::get("sets.lql").map(|s| s.name), Some("sets"));
        assert!(Samples::get("missing").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Samples::names().collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Samples::all().len());
    }

    #[test]
    fn test_samples_start_with_a_comment() {
        for sample in Samples::all() {
            let first = classify(sample.source).next().unwrap();
            assert_eq!(
                first.category,
                TokenCategory::Comment,
                "{} should open with a comment line",
                sample.name
            );
        }
    }
}
