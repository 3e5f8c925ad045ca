//! Region resolution over landed-title trees

use rstest::rstest;

use titloc::domain::{resolve, Attribute, AttributeKeys, Node, RegionMap, TitleFile};
use titloc::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn seed(entries: &[(&str, Option<&str>)]) -> RegionMap {
    entries
        .iter()
        .map(|(code, region)| (*code, region.map(str::to_string)))
        .collect()
}

fn no_keys() -> AttributeKeys {
    AttributeKeys::default()
}

fn duchy(code: &str) -> Node {
    Node::block(code, vec![])
}

#[test]
fn given_seeded_duchy_when_resolving_then_county_and_barony_inherit() {
    // Arrange
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "d_test",
            vec![Node::block("c_test", vec![Node::block("b_test", vec![])])],
        )],
    );

    // Act
    let (_, regions) = resolve([&file], seed(&[("d_test", Some("north"))]), &no_keys());

    // Assert
    let expected = seed(&[
        ("d_test", Some("north")),
        ("c_test", Some("north")),
        ("b_test", Some("north")),
    ]);
    assert_eq!(regions, expected);
}

fn nested_duchies() -> TitleFile {
    TitleFile::new(
        "titles",
        vec![Node::block(
            "d_outer",
            vec![
                Node::block("c_outer", vec![]),
                Node::block(
                    "d_inner",
                    vec![Node::block("c_inner", vec![Node::block("b_inner", vec![])])],
                ),
            ],
        )],
    )
}

#[test]
fn given_seeded_inner_duchy_when_resolving_then_its_own_region_beats_inherited() {
    // Arrange
    let file = nested_duchies();
    let seed_map = seed(&[("d_outer", Some("north")), ("d_inner", Some("south"))]);

    // Act
    let (_, regions) = resolve([&file], seed_map, &no_keys());

    // Assert
    assert_eq!(regions.get("c_outer"), Some("north"));
    assert_eq!(regions.get("d_inner"), Some("south"));
    assert_eq!(regions.get("c_inner"), Some("south"));
    assert_eq!(regions.get("b_inner"), Some("south"));
}

#[test]
fn given_titular_inner_duchy_when_resolving_then_its_counties_stay_titular() {
    // Arrange: an explicit titular entry still overrides the inherited region
    let file = nested_duchies();
    let seed_map = seed(&[("d_outer", Some("north")), ("d_inner", None)]);

    // Act
    let (_, regions) = resolve([&file], seed_map, &no_keys());

    // Assert
    assert_eq!(regions.get("c_outer"), Some("north"));
    assert_eq!(regions.lookup("d_inner"), Some(None));
    assert_eq!(regions.lookup("c_inner"), Some(None));
    assert_eq!(regions.lookup("b_inner"), Some(None));
}

#[test]
fn given_unseeded_inner_duchy_when_resolving_then_counties_inherit_outer_region() {
    let file = nested_duchies();

    let (_, regions) = resolve([&file], seed(&[("d_outer", Some("north"))]), &no_keys());

    assert!(!regions.contains("d_inner"));
    assert_eq!(regions.get("c_inner"), Some("north"));
    assert_eq!(regions.get("b_inner"), Some("north"));
}

#[rstest]
#[case::clear_majority(&["north", "north", "south"], "north")]
#[case::tie_goes_to_first(&["north", "south"], "north")]
#[case::tie_goes_to_first_reversed(&["south", "north"], "south")]
#[case::late_majority(&["south", "north", "north"], "north")]
fn given_duchy_regions_when_resolving_kingdom_then_takes_mode(
    #[case] duchy_regions: &[&str],
    #[case] expected: &str,
) {
    // Arrange
    let codes: Vec<String> = (0..duchy_regions.len()).map(|i| format!("d_{i}")).collect();
    let duchies = codes.iter().map(|code| duchy(code)).collect();
    let file = TitleFile::new("titles", vec![Node::block("k_test", duchies)]);
    let seed_map = codes
        .iter()
        .zip(duchy_regions)
        .map(|(code, region)| (code.as_str(), Some(region.to_string())))
        .collect();

    // Act
    let (_, regions) = resolve([&file], seed_map, &no_keys());

    // Assert
    assert_eq!(regions.get("k_test"), Some(expected));
}

#[test]
fn given_titular_and_unseeded_children_when_voting_then_absents_are_ignored() {
    // Arrange: two children without region outnumber the one with a region
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "k_test",
            vec![duchy("d_titular"), duchy("d_unknown"), duchy("d_real")],
        )],
    );
    let seed_map = seed(&[("d_titular", None), ("d_real", Some("south"))]);

    // Act
    let (_, regions) = resolve([&file], seed_map, &no_keys());

    // Assert
    assert_eq!(regions.get("k_test"), Some("south"));
    assert_eq!(regions.lookup("d_titular"), Some(None));
    assert!(!regions.contains("d_unknown"));
}

#[test]
fn given_no_child_region_when_resolving_empire_then_stays_unset() {
    // Arrange
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "e_test",
            vec![Node::block("k_test", vec![duchy("d_a"), duchy("d_b")])],
        )],
    );

    // Act
    let (attributes, regions) = resolve([&file], seed(&[("d_a", None)]), &no_keys());

    // Assert
    assert!(!regions.contains("e_test"));
    assert!(!regions.contains("k_test"));
    assert!(attributes.contains("e_test"));
}

#[test]
fn given_empire_with_kingdoms_and_duchies_when_resolving_then_all_children_vote_equally() {
    // Arrange
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "e_test",
            vec![
                Node::block("k_one", vec![duchy("d_a"), duchy("d_b")]),
                duchy("d_c"),
                duchy("d_d"),
            ],
        )],
    );
    let seed_map = seed(&[
        ("d_a", Some("west")),
        ("d_b", Some("west")),
        ("d_c", Some("east")),
        ("d_d", Some("east")),
    ]);

    // Act
    let (_, regions) = resolve([&file], seed_map, &no_keys());

    // Assert: k_one yields one "west" vote against two "east"
    assert_eq!(regions.get("k_one"), Some("west"));
    assert_eq!(regions.get("e_test"), Some("east"));
}

#[test]
fn given_counties_under_kingdom_when_resolving_then_they_stay_titular() {
    // Arrange: a county directly under a kingdom inherits nothing
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "k_test",
            vec![Node::block("c_direct", vec![]), duchy("d_a")],
        )],
    );

    // Act
    let (_, regions) = resolve([&file], seed(&[("d_a", Some("north"))]), &no_keys());

    // Assert
    assert_eq!(regions.lookup("c_direct"), Some(None));
    assert_eq!(regions.get("k_test"), Some("north"));
}

#[test]
fn given_duchy_title_attributes_when_resolving_then_pairs_kept_in_encounter_order() {
    // Arrange
    let keys = AttributeKeys::new(["title"], ["culture_x"]);
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "d_test",
            vec![
                Node::scalar("title", "Duchy of Test"),
                Node::scalar("color", "{ 1 2 3 }"),
                Node::scalar("culture_x", "testish"),
            ],
        )],
    );

    // Act
    let (attributes, _) = resolve([&file], RegionMap::new(), &keys);

    // Assert
    assert_eq!(
        attributes.get("d_test").unwrap(),
        &[
            Attribute::new("title", "Duchy of Test"),
            Attribute::new("culture_x", "testish"),
        ]
    );
}

#[test]
fn given_missing_keys_when_resolving_then_title_has_empty_attributes() {
    let keys = AttributeKeys::new(["title"], Vec::<String>::new());
    let file = TitleFile::new("titles", vec![duchy("d_plain")]);

    let (attributes, _) = resolve([&file], RegionMap::new(), &keys);

    assert_eq!(attributes.get("d_plain"), Some(&[][..]));
}

#[test]
fn given_list_value_when_resolving_then_attribute_is_space_joined() {
    let keys = AttributeKeys::new(["male_names"], Vec::<String>::new());
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "d_test",
            vec![Node::list("male_names", ["Roger", "Tancred", "William"])],
        )],
    );

    let (attributes, _) = resolve([&file], RegionMap::new(), &keys);

    assert_eq!(
        attributes.get("d_test").unwrap()[0].value,
        "Roger Tancred William"
    );
}

#[test]
fn given_unknown_tag_codename_when_resolving_then_not_traversed() {
    // Arrange: `x_holder` looks like a codename but is not a title tier
    let keys = AttributeKeys::new(["x_holder"], Vec::<String>::new());
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "d_test",
            vec![Node::block("x_holder", vec![Node::block("c_hidden", vec![])])],
        )],
    );

    // Act
    let (attributes, regions) = resolve([&file], seed(&[("d_test", Some("north"))]), &keys);

    // Assert
    assert!(!attributes.contains("x_holder"));
    assert!(!attributes.contains("c_hidden"));
    assert!(!regions.contains("c_hidden"));
    assert_eq!(
        attributes.get("d_test").unwrap(),
        &[Attribute::new("x_holder", "c_hidden")]
    );
}

#[test]
fn given_duplicate_title_across_files_when_resolving_then_last_definition_wins() {
    // Arrange
    let keys = AttributeKeys::new(["title"], Vec::<String>::new());
    let first = TitleFile::new(
        "00_titles",
        vec![
            Node::block("d_dup", vec![Node::scalar("title", "Old")]),
            duchy("d_other"),
        ],
    );
    let second = TitleFile::new(
        "01_titles",
        vec![Node::block("d_dup", vec![Node::scalar("title", "New")])],
    );

    // Act
    let (attributes, _) = resolve([&first, &second], RegionMap::new(), &keys);

    // Assert
    let titles: Vec<_> = attributes.titles().collect();
    assert_eq!(titles, vec!["d_dup", "d_other"]);
    assert_eq!(attributes.get("d_dup").unwrap()[0].value, "New");
}

#[test]
fn given_same_inputs_when_resolving_twice_then_results_are_identical() {
    // Arrange
    let keys = AttributeKeys::new(["title"], ["greek"]);
    let file = TitleFile::new(
        "titles",
        vec![Node::block(
            "e_test",
            vec![Node::block(
                "k_test",
                vec![
                    Node::block(
                        "d_a",
                        vec![
                            Node::scalar("title", "Duke"),
                            Node::block("c_a", vec![Node::scalar("greek", "Alpha")]),
                        ],
                    ),
                    duchy("d_b"),
                ],
            )],
        )],
    );
    let seed_map = seed(&[("d_a", Some("north")), ("d_b", Some("south"))]);

    // Act
    let first = resolve([&file], seed_map.clone(), &keys);
    let second = resolve([&file], seed_map, &keys);

    // Assert
    assert_eq!(first, second);
}
