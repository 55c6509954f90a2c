use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A named word list in JSON form: `{"name": "...", "words": [...]}`
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub words: Vec<String>,
}

/// Parse a word list.
///
/// JSON objects are read as a [`WordList`]; anything else is treated as
/// plain text with one word or phrase per line, where blank lines and lines
/// starting with `#` are skipped.
pub fn parse_words(contents: &str) -> Result<Vec<String>, serde_json::Error> {
    let trimmed = contents.trim_start();
    if trimmed.starts_with('{') {
        let list: WordList = serde_json::from_str(trimmed)?;
        return Ok(clean(list.words));
    }
    Ok(clean(contents.lines().map(str::to_string)))
}

fn clean(words: impl IntoIterator<Item = String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty() && !w.starts_with('#'))
        .collect()
}

pub fn read_words<P: AsRef<Path>>(path: P) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path.as_ref())?;
    Ok(parse_words(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn plain_text_skips_blanks_and_comments() {
        let words = parse_words("# animals\nelephant\n\n  giraffe  \n#skip\nsea lion\n").unwrap();
        assert_eq!(words, vec!["elephant", "giraffe", "sea lion"]);
    }

    #[test]
    fn json_word_list() {
        let json = r#"{"name": "movies", "words": ["Jaws", " ", "Up"]}"#;
        assert_eq!(parse_words(json).unwrap(), vec!["Jaws", "Up"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_words("{\"name\": 1}").is_err());
    }

    #[test]
    fn read_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "one\ntwo\n").unwrap();
        assert_eq!(read_words(&path).unwrap(), vec!["one", "two"]);
        assert!(read_words(dir.path().join("missing.txt")).is_err());
    }
}
