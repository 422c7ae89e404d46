/// Canonical article sections addressable by a level-2 heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Problem,
    Solution,
    ExpectedResult,
    Prerequisites,
    AdditionalNotes,
    Tags,
}

/// Accepted heading spellings, lowercase. A flat lookup table rather than any
/// kind of section-type hierarchy: every alias is mutually substitutable with
/// the canonical spelling.
const ALIASES: &[(&str, Section)] = &[
    ("problem", Section::Problem),
    ("solution", Section::Solution),
    ("resolution", Section::Solution),
    ("expected result", Section::ExpectedResult),
    ("expected outcome", Section::ExpectedResult),
    ("prerequisites", Section::Prerequisites),
    ("requirements", Section::Prerequisites),
    ("additional notes", Section::AdditionalNotes),
    ("notes", Section::AdditionalNotes),
    ("tags", Section::Tags),
    ("labels", Section::Tags),
];

impl Section {
    /// Resolve a heading's text to its canonical section, case-insensitively.
    /// Unknown headings resolve to `None`; the parser treats those sections as
    /// legal but discards their content.
    pub fn from_heading(heading: &str) -> Option<Section> {
        let needle = heading.trim().to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == needle)
            .map(|(_, section)| *section)
    }

    /// The heading spelling used when serializing.
    pub fn canonical_heading(self) -> &'static str {
        match self {
            Section::Problem => "Problem",
            Section::Solution => "Solution",
            Section::ExpectedResult => "Expected Result",
            Section::Prerequisites => "Prerequisites",
            Section::AdditionalNotes => "Additional Notes",
            Section::Tags => "Tags",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Problem", Section::Problem)]
    #[case("solution", Section::Solution)]
    #[case("Resolution", Section::Solution)]
    #[case("EXPECTED RESULT", Section::ExpectedResult)]
    #[case("Expected Outcome", Section::ExpectedResult)]
    #[case("requirements", Section::Prerequisites)]
    #[case("  Notes  ", Section::AdditionalNotes)]
    #[case("Labels", Section::Tags)]
    fn aliases_resolve_case_insensitively(#[case] heading: &str, #[case] expected: Section) {
        assert_eq!(Section::from_heading(heading), Some(expected));
    }

    #[test]
    fn unknown_headings_do_not_resolve() {
        assert_eq!(Section::from_heading("Troubleshooting"), None);
        assert_eq!(Section::from_heading(""), None);
    }
}
