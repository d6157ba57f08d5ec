/// Parsed form of the `search` query parameter.
///
/// A raw search string mixes free text with `#tag` tokens:
/// `"hello #java world #spring"` filters titles by `"hello world"` and
/// requires posts to carry both the `java` and `spring` tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchCriteria {
    pub title_query: Option<String>,
    pub tags: Vec<String>,
}

impl SearchCriteria {
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// Split a raw search string into a free-text title query and a tag set.
///
/// Tokens are classified solely by their first character: anything starting
/// with `#` and longer than one character becomes a lowercased tag, every
/// other non-blank token is kept as a title word in original order. Tags
/// are deduplicated case-insensitively so that a query like `"#Java #java"`
/// requires one tag, not two.
pub fn parse_search(raw: Option<&str>) -> SearchCriteria {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return SearchCriteria::default(),
    };

    let mut words: Vec<&str> = Vec::new();
    let mut tags: Vec<String> = Vec::new();

    for token in raw.split_whitespace() {
        match token.strip_prefix('#') {
            Some(name) if !name.is_empty() => {
                let name = name.to_lowercase();
                if !tags.contains(&name) {
                    tags.push(name);
                }
            }
            // a lone "#" is ordinary free text, not a tag
            _ => words.push(token),
        }
    }

    let title_query = if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    };

    SearchCriteria { title_query, tags }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_yields_empty_criteria() {
        let criteria = parse_search(None);
        assert_eq!(criteria, SearchCriteria::default());
    }

    #[test]
    fn blank_yields_empty_criteria() {
        assert_eq!(parse_search(Some("   ")), SearchCriteria::default());
        assert_eq!(parse_search(Some("")), SearchCriteria::default());
    }

    #[test]
    fn splits_words_and_tags() {
        let criteria = parse_search(Some("hello #Java #spring world"));
        assert_eq!(criteria.title_query.as_deref(), Some("hello world"));
        assert_eq!(criteria.tags, vec!["java", "spring"]);
    }

    #[test]
    fn word_order_is_preserved() {
        let criteria = parse_search(Some("rust   async    book"));
        assert_eq!(criteria.title_query.as_deref(), Some("rust async book"));
    }

    #[test]
    fn tags_only_leaves_no_title_query() {
        let criteria = parse_search(Some("#java #testing"));
        assert!(criteria.title_query.is_none());
        assert_eq!(criteria.tags, vec!["java", "testing"]);
    }

    #[test]
    fn lone_hash_is_a_free_text_word() {
        let criteria = parse_search(Some("# hello"));
        assert_eq!(criteria.title_query.as_deref(), Some("# hello"));
        assert!(criteria.tags.is_empty());
    }

    #[test]
    fn tags_are_lowercased_and_deduped() {
        let criteria = parse_search(Some("#Java #JAVA #java"));
        assert_eq!(criteria.tags, vec!["java"]);
    }

    #[test]
    fn hash_inside_word_is_not_a_tag() {
        let criteria = parse_search(Some("c# rocks"));
        assert_eq!(criteria.title_query.as_deref(), Some("c# rocks"));
        assert!(criteria.tags.is_empty());
    }

    #[test]
    fn parse_is_deterministic() {
        let a = parse_search(Some("hello #Java world"));
        let b = parse_search(Some("hello #Java world"));
        assert_eq!(a, b);
    }
}
