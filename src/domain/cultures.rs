//! Culture identifiers from culture group definitions.
//!
//! Cultures are the block-valued entries of each top-level group:
//! `byzantine = { graphical_cultures = { ... } greek = { ... } }` yields `greek`.

use indexmap::IndexSet;
use tracing::debug;

use crate::domain::entities::TitleFile;

/// Culture names across all files, deduplicated in first-seen order.
pub fn culture_keys<'f, I>(files: I) -> IndexSet<String>
where
    I: IntoIterator<Item = &'f TitleFile>,
{
    let cultures: IndexSet<String> = files
        .into_iter()
        .flat_map(|file| file.nodes.iter())
        .filter(|group| group.value.is_block())
        .flat_map(|group| group.children())
        .filter(|entry| entry.value.is_block())
        .map(|entry| entry.key.clone())
        .collect();
    debug!(cultures = cultures.len(), "collected culture keys");
    cultures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Node;

    #[test]
    fn given_culture_groups_when_collecting_then_skips_lists_and_scalars() {
        let file = TitleFile::new(
            "00_cultures",
            vec![
                Node::block(
                    "byzantine",
                    vec![
                        Node::list("graphical_cultures", ["byzantinegfx"]),
                        Node::block("greek", vec![Node::scalar("color", "0.4")]),
                        Node::scalar("unit_home", "greek"),
                        Node::block("alan", vec![]),
                    ],
                ),
                Node::scalar("stray", "value"),
                Node::block("north_germanic", vec![Node::block("norse", vec![])]),
            ],
        );

        let cultures = culture_keys([&file]);

        let names: Vec<_> = cultures.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["greek", "alan", "norse"]);
    }
}
