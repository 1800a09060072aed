use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::fs;
use std::path::Path;

use crate::error::{Result, SessionError};

static LANG_DIR: Dir = include_dir!("src/lang");

const DEFAULT_LANGUAGE: &str = "english";

/// A pool of candidate target words
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    /// The word list bundled with the binary
    pub fn builtin() -> Result<Self> {
        read_language_from_dir(&format!("{DEFAULT_LANGUAGE}.json"))
    }

    /// Load a plain-text word list, one word per line. Blank lines are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SessionError::WordlistRead {
            path: path.to_path_buf(),
            source,
        })?;

        let language = Self::from_lines(
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom".to_string()),
            &contents,
        )?;
        log::info!(
            "loaded {} words from {}",
            language.words.len(),
            path.display()
        );
        Ok(language)
    }

    pub fn from_lines(name: String, contents: &str) -> Result<Self> {
        let words: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if words.is_empty() {
            return Err(SessionError::EmptyWordlist);
        }

        Ok(Self {
            name,
            size: words.len() as u32,
            words,
        })
    }

    /// Either the given word list file or the bundled default
    pub fn load(wordlist: Option<&Path>) -> Result<Self> {
        match wordlist {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }
}

fn read_language_from_dir(file_name: &str) -> Result<Language> {
    let Some(file) = LANG_DIR.get_file(file_name) else {
        return Err(SessionError::EmptyWordlist);
    };

    let Some(file_as_str) = file.contents_utf8() else {
        return Err(SessionError::EmptyWordlist);
    };

    let lang: Language = from_str(file_as_str)?;
    if lang.words.is_empty() {
        return Err(SessionError::EmptyWordlist);
    }

    Ok(lang)
}
