//! Domain entities: the parsed game-data tree and title codes

use std::fmt;
use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// One `key = value` entry of a parsed game-data file.
///
/// Title nodes are entries whose key is a title code (`d_sicily`) and whose
/// value is a block holding attributes and sub-titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub key: String,
    pub value: Value,
}

/// Right-hand side of an entry.
///
/// Deserialized untagged: a JSON string is a scalar, an array of
/// `{ key, value }` objects is a block, an array of strings is a list. An
/// empty array reads as an empty block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    Block(Vec<Node>),
    List(Vec<String>),
}

impl Node {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn scalar(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::Scalar(value.into()))
    }

    pub fn list<I, S>(key: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, Value::List(items.into_iter().map(Into::into).collect()))
    }

    pub fn block(key: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(key, Value::Block(children))
    }

    /// Direct children of this node; empty unless the value is a block.
    pub fn children(&self) -> &[Node] {
        self.value.children()
    }

    /// Last direct child with the given key (later definitions win).
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children().iter().rev().find(|n| n.key == key)
    }
}

impl Value {
    pub fn children(&self) -> &[Node] {
        match self {
            Value::Block(nodes) => nodes,
            Value::Scalar(_) | Value::List(_) => &[],
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Value::Block(_))
    }

    /// Text form used as an attribute value.
    ///
    /// Scalars are taken as-is, lists are space-joined. A block contributes
    /// the space-joined keys of its entries.
    pub fn to_text(&self) -> String {
        match self {
            Value::Scalar(s) => s.clone(),
            Value::List(items) => items.join(" "),
            Value::Block(nodes) => nodes.iter().map(|n| n.key.as_str()).join(" "),
        }
    }
}

/// Top-level entries of one parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFile {
    /// Display name, usually the file name
    pub name: String,
    pub nodes: Vec<Node>,
}

impl TitleFile {
    pub fn new(name: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            nodes,
        }
    }

    /// Parse the JSON rendition of a pre-parsed file: an array of nodes.
    pub fn from_json(name: impl Into<String>, content: &str) -> DomainResult<Self> {
        let name = name.into();
        let nodes: Vec<Node> =
            serde_json::from_str(content).map_err(|e| DomainError::InvalidTitleFile {
                name: name.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { name, nodes })
    }
}

/// Hierarchy level of a title, taken from the first character of its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Empire,
    Kingdom,
    Duchy,
    County,
    Barony,
}

fn codename_regex() -> &'static Regex {
    static CODENAME: OnceLock<Regex> = OnceLock::new();
    CODENAME.get_or_init(|| Regex::new(r"^[a-z]_[A-Za-z0-9_'\-]+$").unwrap())
}

/// Whether `key` has the shape of a codename (`x_name`), whatever its tag.
pub fn is_codename(key: &str) -> bool {
    codename_regex().is_match(key)
}

impl Tier {
    /// Tier of a title code, `None` if `code` is not a title.
    ///
    /// A well-formed codename with an unknown tag (`x_foo`) is not a title.
    pub fn of(code: &str) -> Option<Self> {
        if !is_codename(code) {
            return None;
        }
        match code.as_bytes()[0] {
            b'e' => Some(Tier::Empire),
            b'k' => Some(Tier::Kingdom),
            b'd' => Some(Tier::Duchy),
            b'c' => Some(Tier::County),
            b'b' => Some(Tier::Barony),
            _ => None,
        }
    }

    /// Counties and baronies take the region handed down by their liege.
    pub fn inherits_region(self) -> bool {
        matches!(self, Tier::County | Tier::Barony)
    }

    /// Duchies and counties pass a region down to their sub-titles.
    pub fn passes_region_down(self) -> bool {
        matches!(self, Tier::Duchy | Tier::County)
    }

    /// Empires and kingdoms take the majority region of their direct children.
    pub fn votes_for_region(self) -> bool {
        matches!(self, Tier::Empire | Tier::Kingdom)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Empire => "empire",
            Tier::Kingdom => "kingdom",
            Tier::Duchy => "duchy",
            Tier::County => "county",
            Tier::Barony => "barony",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("e_byzantium", Some(Tier::Empire))]
    #[case("k_sicily", Some(Tier::Kingdom))]
    #[case("d_apulia", Some(Tier::Duchy))]
    #[case("c_bari", Some(Tier::County))]
    #[case("b_trani", Some(Tier::Barony))]
    #[case("x_unknown", None)]
    #[case("title", None)]
    #[case("male_names", None)]
    #[case("d_", None)]
    fn given_key_when_classifying_then_returns_tier(
        #[case] key: &str,
        #[case] expected: Option<Tier>,
    ) {
        assert_eq!(Tier::of(key), expected);
    }

    #[test]
    fn given_unknown_tag_when_checking_codename_then_shape_is_still_valid() {
        assert!(is_codename("x_unknown"));
        assert!(Tier::of("x_unknown").is_none());
    }

    #[test]
    fn given_values_when_rendering_text_then_lists_are_space_joined() {
        assert_eq!(Value::Scalar("Sicily".into()).to_text(), "Sicily");
        assert_eq!(
            Value::List(vec!["Roger".into(), "William".into()]).to_text(),
            "Roger William"
        );
        let block = Value::Block(vec![Node::scalar("a", "1"), Node::scalar("b", "2")]);
        assert_eq!(block.to_text(), "a b");
    }

    #[test]
    fn given_json_nodes_when_parsing_then_builds_tree() {
        let json = r#"[
            { "key": "d_test", "value": [
                { "key": "title", "value": "Duke" },
                { "key": "male_names", "value": ["Roger", "Tancred"] },
                { "key": "c_test", "value": [] }
            ]}
        ]"#;

        let file = TitleFile::from_json("test.json", json).unwrap();

        assert_eq!(file.nodes.len(), 1);
        let duchy = &file.nodes[0];
        assert_eq!(duchy.key, "d_test");
        assert_eq!(
            duchy.get("title").map(|n| &n.value),
            Some(&Value::Scalar("Duke".into()))
        );
        assert_eq!(duchy.get("male_names").unwrap().value.to_text(), "Roger Tancred");
        assert!(duchy.get("c_test").unwrap().children().is_empty());
    }

    #[test]
    fn given_invalid_json_when_parsing_then_reports_file_name() {
        let err = TitleFile::from_json("broken.json", "{ not json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn given_duplicate_keys_when_getting_then_last_wins() {
        let node = Node::block(
            "d_test",
            vec![Node::scalar("title", "first"), Node::scalar("title", "second")],
        );
        assert_eq!(node.get("title").unwrap().value.to_text(), "second");
    }
}
