//! Keyword screening of fetched publications.

use crate::models::Publication;

/// Case-insensitive substring filter over title and abstract
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Build a filter; blank keywords are dropped
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether any keyword occurs in the title or abstract
    pub fn matches(&self, publication: &Publication) -> bool {
        let title = publication.title.to_lowercase();
        let abstract_text = publication.r#abstract.to_lowercase();

        self.keywords
            .iter()
            .any(|keyword| title.contains(keyword) || abstract_text.contains(keyword))
    }

    /// Keep the matching publications, preserving order
    pub fn apply(&self, publications: Vec<Publication>) -> Vec<Publication> {
        publications
            .into_iter()
            .filter(|publication| self.matches(publication))
            .collect()
    }
}

/// Screen publications for keywords in their title or abstract
pub fn screen_publications<S: AsRef<str>>(
    publications: Vec<Publication>,
    keywords: &[S],
) -> Vec<Publication> {
    KeywordFilter::new(keywords).apply(publications)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Publication> {
        vec![
            Publication::new("10.1101/1", "Machine Learning for triage"),
            Publication::new("10.1101/2", "A cohort study").with_abstract("We used a GPT4-based pipeline."),
            Publication::new("10.1101/3", "Vitamin D and bones"),
            Publication::new("10.1101/4", "Deep Learning in radiology"),
        ]
    }

    fn dois(publications: &[Publication]) -> Vec<&str> {
        publications.iter().map(|p| p.doi.as_str()).collect()
    }

    #[test]
    fn test_case_insensitive_title_match() {
        let result = screen_publications(sample(), &["machine learning"]);
        assert_eq!(dois(&result), vec!["10.1101/1"]);
    }

    #[test]
    fn test_substring_match_in_abstract() {
        let result = screen_publications(sample(), &["GPT4"]);
        assert_eq!(dois(&result), vec!["10.1101/2"]);
    }

    #[test]
    fn test_any_keyword_preserves_order() {
        let result = screen_publications(sample(), &["deep learning", "MACHINE"]);
        assert_eq!(dois(&result), vec!["10.1101/1", "10.1101/4"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(screen_publications(sample(), &["quantum chromodynamics"]).is_empty());
    }

    #[test]
    fn test_blank_keywords_match_nothing() {
        let filter = KeywordFilter::new(["", "   "]);
        assert!(filter.is_empty());
        assert!(filter.apply(sample()).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let keywords = ["learning", "gpt4"];
        let once = screen_publications(sample(), &keywords);
        let twice = screen_publications(once.clone(), &keywords);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_not_word_boundary_aware() {
        let result = screen_publications(sample(), &["earn"]);
        assert_eq!(dois(&result), vec!["10.1101/1", "10.1101/4"]);
    }
}
