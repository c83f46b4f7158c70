use std::collections::BTreeMap;

use crate::model::Question;

/// Read-only mapping of category name to an ordered question list.
///
/// Loaded once at startup; sessions borrow from it and never mutate it.
/// Categories iterate in name order so menus stay stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    categories: BTreeMap<String, Vec<Question>>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(categories: BTreeMap<String, Vec<Question>>) -> Self {
        Self { categories }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Category names in iteration (sorted) order.
    #[must_use]
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Questions for a category, or `None` when the category is unknown.
    #[must_use]
    pub fn questions(&self, category: &str) -> Option<&[Question]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Question])> {
        self.categories
            .iter()
            .map(|(name, questions)| (name.as_str(), questions.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, answer: &str) -> Question {
        Question::new(
            text,
            vec![answer.to_owned(), "other".to_owned()],
            answer,
        )
        .unwrap()
    }

    fn build_bank() -> QuestionBank {
        let mut categories = BTreeMap::new();
        categories.insert("Science".to_owned(), vec![question("Q1", "A1")]);
        categories.insert("Math".to_owned(), vec![question("Q2", "A2")]);
        QuestionBank::new(categories)
    }

    #[test]
    fn category_names_are_sorted() {
        let bank = build_bank();
        assert_eq!(bank.category_names(), vec!["Math", "Science"]);
    }

    #[test]
    fn questions_returns_none_for_unknown_category() {
        let bank = build_bank();
        assert!(bank.questions("History").is_none());
        assert_eq!(bank.questions("Math").unwrap().len(), 1);
    }

    #[test]
    fn empty_bank_has_no_categories() {
        let bank = QuestionBank::empty();
        assert!(bank.is_empty());
        assert_eq!(bank.len(), 0);
    }
}
