//! Front-matter parsing

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::helpers::parse_date;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Accepts any scalar and keeps its textual form, so `date: 2020` is
/// reported as an unparseable date rather than a type error
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct Scalar;

    impl<'de> Visitor<'de> for Scalar {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a date string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(Scalar)
        }
    }

    deserializer.deserialize_any(Scalar)
}

/// Front-matter data from a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub lastmod: Option<String>,
    /// Posts are published unless they opt out
    pub published: bool,
    pub draft: bool,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub categories: Vec<String>,
    pub slug: Option<String>,
    #[serde(rename = "showWordCount")]
    pub show_word_count: Option<bool>,
    pub discuss: Option<bool>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            lastmod: None,
            published: true,
            draft: false,
            description: None,
            tags: Vec::new(),
            categories: Vec::new(),
            slug: None,
            show_word_count: None,
            discuss: None,
            extra: IndexMap::new(),
        }
    }
}

/// Which syntax the metadata block was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        Self::parse_with_format(content).map(|(fm, body, _)| (fm, body))
    }

    /// Like [`FrontMatter::parse`], also reporting the block syntax
    pub fn parse_with_format(content: &str) -> Result<(Self, &str, Option<Format>)> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }
        if content.starts_with("+++") {
            let (fm, body) = Self::parse_toml(content)?;
            return Ok((fm, body, Some(Format::Toml)));
        }
        if starts_json_object(content) {
            let (fm, body) = Self::parse_json(content)?;
            return Ok((fm, body, Some(Format::Json)));
        }

        // No front-matter found
        Ok((FrontMatter::default(), content, None))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str, Option<Format>)> {
        let first_line = content.lines().next().unwrap_or_default();
        if first_line.trim_end() != "---" {
            return Ok((FrontMatter::default(), content, None));
        }

        let Some((block, remaining)) = split_block(content, "---") else {
            // A lone thematic break, not a metadata block
            if !looks_like_yaml(&content[first_line.len()..]) {
                return Ok((FrontMatter::default(), content, None));
            }
            return Err(Error::FrontMatter(
                "YAML front-matter is missing its closing `---`".to_string(),
            ));
        };

        if block.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining, Some(Format::Yaml)));
        }

        // `---` separators around prose are markdown, not metadata
        if !looks_like_yaml(block) {
            return Ok((FrontMatter::default(), content, None));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(block)
            .map_err(|e| Error::FrontMatter(format!("YAML: {}", e)))?;
        Ok((fm, remaining, Some(Format::Yaml)))
    }

    fn parse_toml(content: &str) -> Result<(Self, &str)> {
        let (block, remaining) = split_block(content, "+++").ok_or_else(|| {
            Error::FrontMatter("TOML front-matter is missing its closing `+++`".to_string())
        })?;

        let mut table: toml::Table = block.parse()?;
        for (_, value) in table.iter_mut() {
            stringify_datetimes(value);
        }
        let fm: FrontMatter = toml::Value::Table(table).try_into()?;
        Ok((fm, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<FrontMatter>();
        let fm = match stream.next() {
            Some(fm) => fm?,
            None => return Err(Error::FrontMatter("empty JSON front-matter".to_string())),
        };
        let remaining = content[stream.byte_offset()..].trim_start_matches(['\n', '\r']);
        Ok((fm, remaining))
    }

    /// Parse the date field in the given site time zone
    pub fn parse_date(&self, tz: &Tz) -> Option<DateTime<FixedOffset>> {
        self.date.as_deref().and_then(|s| parse_date(s, tz))
    }

    /// Parse the lastmod field in the given site time zone
    pub fn parse_lastmod(&self, tz: &Tz) -> Option<DateTime<FixedOffset>> {
        self.lastmod.as_deref().and_then(|s| parse_date(s, tz))
    }
}

/// Split `content` (starting with `delim`) into the block between the
/// opening delimiter line and the next line consisting solely of `delim`,
/// and whatever follows it
fn split_block<'a>(content: &'a str, delim: &str) -> Option<(&'a str, &'a str)> {
    let first_newline = content.find('\n')?;
    if content[..first_newline].trim_end() != delim {
        return None;
    }
    let rest = &content[first_newline + 1..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delim {
            let block = &rest[..offset];
            let remaining = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Some((block, remaining));
        }
        offset += line.len();
    }
    None
}

/// `{` followed by a line break or a quoted key; `{{< shortcode >}}` is body text
fn starts_json_object(content: &str) -> bool {
    let Some(rest) = content.strip_prefix('{') else {
        return false;
    };
    let rest = rest.trim_start_matches([' ', '\t']);
    rest.starts_with(['\n', '\r', '"']) || rest.starts_with('}')
}

/// Whether a block has at least one `key: value` line
fn looks_like_yaml(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after = &trimmed[colon_pos + 1..];
        is_valid_key && (after.is_empty() || after.starts_with(' '))
    })
}

fn stringify_datetimes(value: &mut toml::Value) {
    match value {
        toml::Value::Datetime(dt) => *value = toml::Value::String(dt.to_string()),
        toml::Value::Array(items) => items.iter_mut().for_each(stringify_datetimes),
        toml::Value::Table(table) => table
            .iter_mut()
            .for_each(|(_, v)| stringify_datetimes(v)),
        _ => {}
    }
}
