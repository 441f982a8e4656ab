//! Integration tests loading the sample stories

use std::path::PathBuf;
use storyboard::core::loader::load_story;
use storyboard::core::models::Connector;
use storyboard::core::{StoryError, StoryStats};

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples/stories")
        .join(name)
}

#[test]
fn test_harbour_loads() {
    let story = load_story(sample("harbour.tsv")).expect("harbour should load");

    assert_eq!(story.name, "harbour");
    assert_eq!(story.timelines().len(), 2);
    assert!(story.find_line("lighthouse").is_some());
    assert!(story.find_event("gale-reef").is_some());
    assert!(story.find_character("Ghost").is_some());
    assert!(story.find_character("Ghost*").is_none());
}

#[test]
fn test_harbour_stats() {
    let mut story = load_story(sample("harbour.tsv")).unwrap();
    story.finalize().unwrap();

    assert_eq!(
        story.stats(),
        StoryStats {
            events: 8,
            timeboxes: 6,
            characters: 4,
            combined_groups: 1,
            lines: 7,
        }
    );
}

#[test]
fn test_rescuers_travel_together() {
    let mut story = load_story(sample("harbour.tsv")).unwrap();
    story.finalize().unwrap();

    let rescuers = story
        .combiners()
        .iter()
        .find(|combiner| combiner.name == "Rescuers")
        .unwrap();
    // dinner -> watch and watch -> rescue
    assert_eq!(rescuers.bridges.len(), 2);
    for id in &rescuers.bridges {
        let bridge = story.bridge(*id);
        assert_eq!(bridge.children.len(), 2);
        assert!(matches!(bridge.connector, Connector::Combiner(_)));
    }

    let watch = story.find_event("watch").unwrap();
    let to_rescue = rescuers
        .bridges
        .iter()
        .find(|id| story.bridge(**id).past == watch)
        .unwrap();
    assert!(story.bridge_is_dashed(*to_rescue));
    assert_eq!(story.bridge_label(*to_rescue), "R-2");
}

#[test]
fn test_friendships() {
    let mut story = load_story(sample("harbour.tsv")).unwrap();
    story.finalize().unwrap();

    let mara = story.find_character("Mara").unwrap();
    let tom = story.find_character("Tom").unwrap();
    let ida = story.find_character("Ida").unwrap();

    // arrival and rescue
    assert_eq!(story.count_meetings(mara, tom), (2, 2));
    assert_eq!(story.count_meetings(mara, ida), (3, 3));
    // the crowd scene is left off the friendship graph
    assert!(!story.friendship_roster(tom).contains(&tom));
}

#[test]
fn test_missing_columns() {
    let err = load_story(sample("missing_columns.tsv")).unwrap_err();
    match err {
        StoryError::MissingColumns(columns) => assert_eq!(columns, vec!["SHORTNAME"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_place_reports_line() {
    let err = load_story(sample("unknown_place.tsv")).unwrap_err();
    assert!(matches!(err, StoryError::AtLine { line: 3, .. }));
    assert!(err.to_string().contains('3'));
}
