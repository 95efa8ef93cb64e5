//! Recipe list loader.

use std::path::Path;

use item_use_core::{Recipe, RecipesSnapshot};

use crate::loaders::{LoadResult, read_file};

/// Loader for crafting recipes from RON files.
///
/// Only the parts repair difficulty depends on are read: result, skill,
/// difficulty, required skills, tools and qualities.
pub struct RecipeLoader;

impl RecipeLoader {
    pub fn load(path: &Path) -> LoadResult<RecipesSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RecipesSnapshot> {
        let recipes: Vec<Recipe> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse recipe list RON: {}", e))?;

        if let Some(recipe) = recipes.iter().find(|r| r.result.is_empty()) {
            anyhow::bail!("Recipe '{}' has no result", recipe.id);
        }
        Ok(RecipesSnapshot::new(recipes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_use_core::{ItemTypeId, RecipeOracle, SkillId};

    #[test]
    fn parses_recipes() {
        let recipes = RecipeLoader::parse(
            r#"[(
                id: "gloves_leather",
                result: "gloves_leather",
                skill_used: "tailor",
                difficulty: 3,
                required_skills: {"fabrication": 1},
            )]"#,
        )
        .unwrap();
        let found = recipes.recipes_for(&ItemTypeId::new("gloves_leather"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].skill_used, SkillId::new("tailor"));
        assert_eq!(found[0].required_skills.get(&SkillId::new("fabrication")), Some(&1));
    }

    #[test]
    fn rejects_recipes_without_result() {
        let err = RecipeLoader::parse(r#"[(id: "mystery", difficulty: 1)]"#).unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }
}
