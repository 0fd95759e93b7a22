#![cfg(feature = "rusqlite")]

mod common;

use std::collections::BTreeMap;

use common::setup;
use rusqlite::OptionalExtension;
use stitch::prelude::*;

#[test]
fn join_with_has_one() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with("profile")
        .one(1)
        .unwrap()
        .expect("user 1 exists");

    let profile = user.relation("profile").expect("profile joined");
    assert_eq!(profile.entity(), "profile");
    assert_eq!(
        profile.attr("user_id"),
        Some(&SqlValue::Integer(1)),
        "related row belongs to the fetched user"
    );
}

#[test]
fn join_with_constraint_picks_matching_row() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with(("profile", eq(col("profiles.type"), val("buyer"))))
        .one(1)
        .unwrap()
        .expect("user 1 exists");

    let profile = user.relation("profile").expect("buyer profile joined");
    assert_eq!(profile.attr("id"), Some(&SqlValue::Integer(2)));
    assert_eq!(profile.attr("type"), Some(&SqlValue::Text("buyer".into())));
}

#[test]
fn join_with_absent_relation() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with("profile")
        .one(2)
        .unwrap()
        .expect("user 2 exists");

    assert!(user.has_relation("profile"), "relation slot was loaded");
    assert!(user.relation("profile").is_none(), "no profile row exists");
}

#[test]
fn join_with_absent_relation_default_policy() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with("profile_or_default")
        .one(2)
        .unwrap()
        .expect("user 2 exists");

    let stand_in = user
        .relation("profile_or_default")
        .expect("default policy produces an entity");
    assert_eq!(stand_in.attr("type"), Some(&SqlValue::Text("seller".into())));
    assert_eq!(stand_in.attr("id"), None, "defaults only, never a real row");
}

#[test]
fn join_with_belongs_to() {
    let db = setup();

    let profile = db
        .fetch("profile")
        .join_with("user")
        .one(1)
        .unwrap()
        .expect("profile 1 exists");

    let user = profile.relation("user").expect("owning user joined");
    assert_eq!(user.attr("id"), Some(&SqlValue::Integer(1)));
}

#[test]
fn join_with_matches_separate_queries() {
    let db = setup();

    let users = db
        .fetch("user")
        .join_with(("profile", eq(col("profiles.type"), val("seller"))))
        .all()
        .unwrap();
    assert_eq!(users.len(), 2);

    for user in &users {
        let id = user.attr("id").and_then(SqlValue::as_integer).unwrap();
        let expected: Option<i64> = db
            .conn()
            .query_row(
                "SELECT id FROM profiles WHERE user_id = ?1 AND type = 'seller' LIMIT 1",
                [id],
                |row| row.get(0),
            )
            .optional()
            .unwrap();

        match expected {
            Some(profile_id) => {
                let profile = user.relation("profile").expect("profile joined");
                assert_eq!(profile.attr("id"), Some(&SqlValue::Integer(profile_id)));
            }
            None => {
                assert!(user.has_relation("profile"));
                assert!(user.relation("profile").is_none());
            }
        }
    }
}

#[test]
fn nested_path_hydrates_three_levels() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with("profile.city.country")
        .one(1)
        .unwrap()
        .expect("user 1 exists");

    let expected: BTreeMap<String, SqlValue> = [
        ("id", SqlValue::Integer(1)),
        ("profile.id", SqlValue::Integer(1)),
        ("profile.user_id", SqlValue::Integer(1)),
        ("profile.country_id", SqlValue::Integer(1)),
        ("profile.city_id", SqlValue::Integer(10)),
        ("profile.type", SqlValue::Text("seller".into())),
        ("profile.city.id", SqlValue::Integer(10)),
        ("profile.city.country_id", SqlValue::Integer(1)),
        ("profile.city.country.id", SqlValue::Integer(1)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    assert_eq!(user.flatten(), expected);
}

#[test]
fn shared_prefix_paths_reuse_the_join() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with(["profile", "profile.country"])
        .one(1)
        .unwrap()
        .expect("user 1 exists");

    let profile = user.relation("profile").expect("profile joined");
    assert_eq!(profile.attr("id"), Some(&SqlValue::Integer(1)));
    let country = profile.relation("country").expect("country joined");
    assert_eq!(country.attr("id"), Some(&SqlValue::Integer(1)));
}

#[test]
fn repeated_path_is_idempotent() {
    let db = setup();

    let once = db
        .fetch("user")
        .join_with("profile")
        .one(1)
        .unwrap()
        .unwrap();
    let twice = db
        .fetch("user")
        .join_with("profile")
        .join_with("profile")
        .one(1)
        .unwrap()
        .unwrap();

    assert_eq!(once.flatten(), twice.flatten());
}

#[test]
fn last_constraint_wins_for_a_repeated_path() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with(("profile", eq(col("profiles.type"), val("seller"))))
        .join_with(("profile", eq(col("profiles.type"), val("buyer"))))
        .one(1)
        .unwrap()
        .unwrap();

    let profile = user.relation("profile").expect("profile joined");
    assert_eq!(profile.attr("type"), Some(&SqlValue::Text("buyer".into())));
}

#[test]
fn constraint_on_nested_segment_leaves_parent_untouched() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with([
            ("profile", Sql::empty()),
            ("profile.country", eq(col("countries.id"), val(99))),
        ])
        .one(1)
        .unwrap()
        .unwrap();

    let profile = user.relation("profile").expect("profile join unaffected");
    assert_eq!(profile.attr("id"), Some(&SqlValue::Integer(1)));
    assert!(profile.has_relation("country"));
    assert!(
        profile.relation("country").is_none(),
        "constraint filtered the country join only"
    );
}

#[test]
fn has_many_join_is_a_configuration_error() {
    let db = setup();

    let err = db.fetch("user").join_with("posts").all().unwrap_err();
    assert!(matches!(
        err,
        StitchError::UnsupportedShape { ref relation, .. } if relation == "posts"
    ));
}

#[test]
fn unknown_relation_is_an_error() {
    let db = setup();

    let err = db.fetch("user").join_with("followers").all().unwrap_err();
    assert!(matches!(
        err,
        StitchError::UnknownRelation { ref relation, .. } if relation == "followers"
    ));
}

#[test]
fn hydration_leaves_no_prefixed_keys() {
    let db = setup();

    let user = db
        .fetch("user")
        .join_with(["profile", "profile.city.country"])
        .one(1)
        .unwrap()
        .unwrap();

    for prefix in ["profiles_", "cities_", "countries_"] {
        assert!(
            !user.attributes().keys().any(|key| key.starts_with(prefix)),
            "leftover `{prefix}` keys in root attributes"
        );
    }

    let profile = user.relation("profile").unwrap();
    for prefix in ["cities_", "countries_"] {
        assert!(
            !profile.attributes().keys().any(|key| key.starts_with(prefix)),
            "leftover `{prefix}` keys in profile attributes"
        );
    }
}
