//! Prompt categories and uniform random selection.

use derive_getters::Getters;
use larkpost_error::{ConfigError, JsonError, LarkpostResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named prompt sent to the content generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PromptCategory {
    /// Category label, unique within a set
    name: String,
    /// Prompt text sent to the generator
    description: String,
}

impl PromptCategory {
    /// Create a prompt category.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Body of one entry in a prompts file.
#[derive(Debug, Clone, Deserialize)]
struct PromptBody {
    description: String,
}

/// Shape of a prompts file: `{"prompts": {"<name>": {"description": "..."}}}`.
#[derive(Debug, Clone, Deserialize)]
struct PromptsFile {
    prompts: BTreeMap<String, PromptBody>,
}

/// Non-empty set of prompt categories.
///
/// A `PromptSet` can only be constructed with at least one category, so
/// [`PromptSet::choose`] always has something to return.
///
/// # Examples
///
/// ```
/// use larkpost_core::{PromptCategory, PromptSet};
///
/// let set = PromptSet::new(vec![PromptCategory::new("A", "desc-A")]).unwrap();
/// let picked = set.choose(&mut rand::thread_rng());
/// assert_eq!(picked.description(), "desc-A");
///
/// assert!(PromptSet::new(Vec::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    categories: Vec<PromptCategory>,
}

impl PromptSet {
    /// Build a set from categories. Later categories replace earlier ones with
    /// the same name.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if no categories are given or a description is
    /// blank.
    #[track_caller]
    pub fn new(categories: impl IntoIterator<Item = PromptCategory>) -> LarkpostResult<Self> {
        let mut by_name = BTreeMap::new();
        for category in categories {
            if category.description.trim().is_empty() {
                return Err(ConfigError::new(format!(
                    "Prompt category '{}' has an empty description",
                    category.name
                ))
                .into());
            }
            by_name.insert(category.name.clone(), category);
        }

        if by_name.is_empty() {
            return Err(ConfigError::new("Prompt set is empty").into());
        }

        Ok(Self {
            categories: by_name.into_values().collect(),
        })
    }

    /// Build a set from a name → description map.
    pub fn from_map(map: BTreeMap<String, String>) -> LarkpostResult<Self> {
        Self::new(
            map.into_iter()
                .map(|(name, description)| PromptCategory::new(name, description)),
        )
    }

    /// Parse a prompts file of the form
    /// `{"prompts": {"<name>": {"description": "..."}}}`.
    pub fn from_json(json: &str) -> LarkpostResult<Self> {
        let file: PromptsFile = serde_json::from_str(json)
            .map_err(|e| JsonError::new(format!("Failed to parse prompts file: {}", e)))?;

        Self::new(
            file.prompts
                .into_iter()
                .map(|(name, body)| PromptCategory::new(name, body.description)),
        )
    }

    /// Pick one category uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &PromptCategory {
        let index = rng.gen_range(0..self.categories.len());
        &self.categories[index]
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Option<&PromptCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Number of categories (always at least one).
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate categories in name order.
    pub fn iter(&self) -> impl Iterator<Item = &PromptCategory> {
        self.categories.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn test_empty_set_is_config_error() {
        let err = PromptSet::new(Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Prompt set is empty"));
    }

    #[test]
    fn test_blank_description_rejected() {
        let result = PromptSet::new(vec![PromptCategory::new("blank", "   ")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_names_keep_last() {
        let set = PromptSet::new(vec![
            PromptCategory::new("A", "first"),
            PromptCategory::new("A", "second"),
        ])
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A").unwrap().description(), "second");
    }

    #[test]
    fn test_parse_prompts_file() {
        let json = r#"{
            "prompts": {
                "motivation": {"description": "Write a motivational quote."},
                "tech": {"description": "Share a short tech tip."}
            }
        }"#;
        let set = PromptSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get("tech").unwrap().description(),
            "Share a short tech tip."
        );
    }

    #[test]
    fn test_parse_prompts_file_without_prompts_key() {
        assert!(PromptSet::from_json(r#"{"other": {}}"#).is_err());
    }

    #[test]
    fn test_choice_belongs_to_set() {
        let set = PromptSet::new(vec![
            PromptCategory::new("A", "desc-A"),
            PromptCategory::new("B", "desc-B"),
            PromptCategory::new("C", "desc-C"),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let picked = set.choose(&mut rng);
            assert!(set.iter().any(|c| c == picked));
        }
    }

    #[test]
    fn test_choice_is_roughly_uniform() {
        let set = PromptSet::new(vec![
            PromptCategory::new("A", "desc-A"),
            PromptCategory::new("B", "desc-B"),
            PromptCategory::new("C", "desc-C"),
            PromptCategory::new("D", "desc-D"),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 40_000;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(set.choose(&mut rng).name().clone()).or_default() += 1;
        }

        assert_eq!(counts.len(), 4);
        let expected = trials / 4;
        for (name, count) in counts {
            let deviation = (count as f64 - expected as f64).abs() / expected as f64;
            assert!(deviation < 0.05, "{} chosen {} times", name, count);
        }
    }
}
