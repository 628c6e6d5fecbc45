use itertools::Itertools;
use std::collections::HashSet;

use super::core::{KanaPair, KanaSet, Script};
use crate::error::{QuizError, Result};

pub const ALL_GROUPS: &str = "all";

/// The characters eligible in the current session.
///
/// Built from the user's script and group selection; read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    characters: Vec<KanaPair>,
}

impl Pool {
    pub fn new(characters: Vec<KanaPair>) -> Result<Self> {
        if characters.is_empty() {
            return Err(QuizError::invalid("character pool is empty"));
        }
        let mut seen = HashSet::new();
        let characters = characters
            .into_iter()
            .filter(|pair| seen.insert(pair.kana.clone()))
            .collect();
        Ok(Self { characters })
    }

    /// Select groups by kind (`base`, `dakuon`, `yoon`), row name (`ka`, `sha`)
    /// or `all`. An empty selection means `base`.
    pub fn from_selection(scripts: &[Script], groups: &[String]) -> Result<Self> {
        if scripts.is_empty() {
            return Err(QuizError::invalid("no script selected"));
        }
        let wanted: Vec<&str> = if groups.is_empty() {
            vec!["base"]
        } else {
            groups.iter().map(|g| g.trim()).collect()
        };

        let sets = scripts
            .iter()
            .unique()
            .map(|script| KanaSet::load(*script))
            .collect::<Result<Vec<_>>>()?;

        for name in &wanted {
            let known = *name == ALL_GROUPS
                || sets
                    .iter()
                    .flat_map(|set| set.groups.iter())
                    .any(|g| g.kind == *name || g.name == *name);
            if !known {
                return Err(QuizError::invalid(format!("unknown kana group '{name}'")));
            }
        }

        let characters = sets
            .iter()
            .flat_map(|set| set.groups.iter())
            .filter(|g| {
                wanted
                    .iter()
                    .any(|w| *w == ALL_GROUPS || g.kind == *w || g.name == *w)
            })
            .flat_map(|g| g.characters.iter().cloned())
            .collect();

        Self::new(characters)
    }

    pub fn characters(&self) -> &[KanaPair] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn find(&self, kana: &str) -> Option<&KanaPair> {
        self.characters.iter().find(|pair| pair.kana == kana)
    }
}

/// Human readable listing used by `--list-groups`
pub fn describe_groups(script: Script) -> Result<Vec<String>> {
    let set = KanaSet::load(script)?;
    let script_name = script.to_string();
    Ok(set
        .groups
        .iter()
        .map(|g| {
            format!(
                "{script_name:<9} {:<7} {:<4} {}",
                g.kind,
                g.name,
                g.characters.iter().map(|c| c.kana.as_str()).join(" ")
            )
        })
        .collect())
}
