//! Front-matter parsing and serialization

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
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
            while let Some(item) = seq.next_element::<Scalar>()? {
                vec.push(item.0);
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

    deserializer.deserialize_any(StringOrVec).map(Some)
}

/// A YAML scalar read as text, so `date: 2024` or `title: 42` still load
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
                Ok(Scalar(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| s.0))
}

/// Front-matter of a post record.
///
/// Every field is optional and kept exactly as stored; defaults are applied
/// by the readers that need them, never written back. Keys outside the known
/// schema are kept in `extra`, in file order, so they survive rewrites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "string_or_vec", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(
        rename = "coverImage",
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from file content.
    ///
    /// Returns `(front_matter, body)`. Content without a front-matter block,
    /// or whose block does not look like YAML, yields a default front-matter
    /// and the content unchanged. A block that looks like YAML but fails to
    /// deserialize is an error.
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        match locate(content) {
            (Some(yaml_content), body) => Ok((serde_yaml::from_str::<FrontMatter>(yaml_content)?, body)),
            (None, body) => Ok((FrontMatter::default(), body)),
        }
    }

    /// Parse front-matter, dropping known fields whose values have the wrong
    /// shape instead of failing.
    ///
    /// `published` is kept only when it is a boolean and `tags` only when it
    /// is a list; list items and the text fields accept any scalar. Only YAML
    /// that cannot be read at all is an error.
    pub fn parse_lenient(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let (yaml_content, body) = match locate(content) {
            (Some(yaml_content), body) => (yaml_content, body),
            (None, body) => return Ok((FrontMatter::default(), body)),
        };

        let mut fields: IndexMap<String, serde_yaml::Value> = serde_yaml::from_str(yaml_content)?;
        let mut take = |key: &str| fields.shift_remove(key);

        let title = take("title").as_ref().and_then(scalar_text);
        let description = take("description").as_ref().and_then(scalar_text);
        let date = take("date").as_ref().and_then(scalar_text);
        let author = take("author").as_ref().and_then(scalar_text);
        let tags = match take("tags") {
            Some(serde_yaml::Value::Sequence(items)) => {
                Some(items.iter().filter_map(scalar_text).collect())
            }
            _ => None,
        };
        let category = take("category").as_ref().and_then(scalar_text);
        let published = take("published").and_then(|v| v.as_bool());
        let cover_image = take("coverImage").as_ref().and_then(scalar_text);

        let fm = FrontMatter {
            title,
            description,
            date,
            author,
            tags,
            category,
            published,
            cover_image,
            extra: fields,
        };
        Ok((fm, body))
    }

    /// Serialize front-matter and body back into file content
    pub fn to_file_string(&self, body: &str) -> Result<String, serde_yaml::Error> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n{}", yaml, body))
    }

    /// Whether the block carried no keys at all
    pub fn is_empty(&self) -> bool {
        *self == FrontMatter::default()
    }
}

/// Find the YAML block worth parsing, if any, and the body.
///
/// Content without a block, or whose block does not look like YAML, has no
/// YAML and is all body. An empty block has no YAML either.
fn locate(content: &str) -> (Option<&str>, &str) {
    let content = content.trim_start_matches('\u{feff}');

    let Some((yaml_content, body)) = split_block(content) else {
        return (None, content);
    };
    if yaml_content.trim().is_empty() {
        return (None, body);
    }
    if !has_yaml_structure(yaml_content) {
        // This doesn't look like YAML, treat as no front-matter
        return (None, content);
    }
    (Some(yaml_content), body)
}

/// Text of a YAML scalar; sequences, mappings and nulls have none
fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Split `---` delimited front-matter from the body.
///
/// The opening delimiter must be the first line and the closing delimiter a
/// line of its own. The body starts right after the closing line's break.
fn split_block(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Valid YAML front-matter has at least one `key: value` line; prose or
/// markdown between two `---` separators does not.
fn has_yaml_structure(yaml_content: &str) -> bool {
    yaml_content.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        if let Some(colon_pos) = trimmed.find(':') {
            let before_colon = &trimmed[..colon_pos];
            // Key is a simple identifier and not a URL scheme
            let is_valid_key = !before_colon.is_empty()
                && before_colon
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                && !matches!(before_colon, "http" | "https" | "ftp");
            if is_valid_key {
                let after_colon = &trimmed[colon_pos + 1..];
                return after_colon.is_empty() || after_colon.starts_with(' ');
            }
        }
        false
    })
}
