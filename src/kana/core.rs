use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::from_str;

use crate::error::{QuizError, Result};

static KANA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/kana/data");

/// Writing system a kana table belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Script {
    Hiragana,
    Katakana,
}

/// A kana glyph and its romanization
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KanaPair {
    pub kana: String,
    pub romaji: String,
}

impl KanaPair {
    pub fn new(kana: impl Into<String>, romaji: impl Into<String>) -> Self {
        Self {
            kana: kana.into(),
            romaji: romaji.into(),
        }
    }
}

/// Characters are keyed by their kana glyph
impl AsRef<str> for KanaPair {
    fn as_ref(&self) -> &str {
        &self.kana
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct KanaGroup {
    pub name: String,
    pub kind: String,
    pub characters: Vec<KanaPair>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct KanaSet {
    pub name: String,
    pub size: u32,
    pub groups: Vec<KanaGroup>,
}

impl KanaSet {
    pub fn load(script: Script) -> Result<Self> {
        read_kana_from_file(&format!("{script}.json"))
    }

    /// Distinct group kinds in table order
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::new();
        for group in &self.groups {
            if !kinds.contains(&group.kind.as_str()) {
                kinds.push(&group.kind);
            }
        }
        kinds
    }
}

fn read_kana_from_file(file_name: &str) -> Result<KanaSet> {
    let file = KANA_DIR
        .get_file(file_name)
        .ok_or_else(|| QuizError::invalid(format!("kana table {file_name} not found")))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| QuizError::invalid(format!("kana table {file_name} is not utf-8")))?;

    Ok(from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiragana_table_loads() {
        let set = KanaSet::load(Script::Hiragana).unwrap();
        assert_eq!(set.name, "hiragana");
        let total: usize = set.groups.iter().map(|g| g.characters.len()).sum();
        assert_eq!(total as u32, set.size);
        assert_eq!(set.kinds(), vec!["base", "dakuon", "yoon"]);
    }

    #[test]
    fn katakana_mirrors_hiragana_layout() {
        let hira = KanaSet::load(Script::Hiragana).unwrap();
        let kata = KanaSet::load(Script::Katakana).unwrap();
        assert_eq!(hira.groups.len(), kata.groups.len());
        assert_eq!(kata.groups[1].characters[0], KanaPair::new("カ", "ka"));
    }

    #[test]
    fn script_display_matches_file_names() {
        assert_eq!(Script::Hiragana.to_string(), "hiragana");
        assert_eq!(Script::Katakana.to_string(), "katakana");
    }

    #[test]
    fn missing_table_is_an_error() {
        assert!(read_kana_from_file("klingon.json").is_err());
    }

    #[test]
    fn kana_deserialization() {
        let json = r#"{"name":"t","size":1,"groups":[{"name":"a","kind":"base","characters":[{"kana":"あ","romaji":"a"}]}]}"#;
        let set: KanaSet = from_str(json).unwrap();
        assert_eq!(set.groups[0].characters[0].as_ref(), "あ");
    }
}
