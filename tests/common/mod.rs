#![allow(dead_code)]

use stitch::prelude::*;

/// Registry for the user / profile / city / country scenario.
///
/// `posts` exists only to exercise the has-many rejection; its table is
/// never created because planning must fail before touching the catalog.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(
            EntityDef::new("user", "users")
                .relation(RelationDef::has_one("profile", "profile", "user_id", "id"))
                .relation(
                    RelationDef::has_one("profile_or_default", "profile", "user_id", "id")
                        .with_default([("type", "seller")]),
                )
                .relation(RelationDef::has_many("posts", "post", "user_id", "id")),
        )
        .register(
            EntityDef::new("profile", "profiles")
                .relation(RelationDef::belongs_to("user", "user", "user_id", "id"))
                .relation(RelationDef::belongs_to(
                    "country", "country", "country_id", "id",
                ))
                .relation(RelationDef::belongs_to("city", "city", "city_id", "id")),
        )
        .register(
            EntityDef::new("city", "cities").relation(RelationDef::belongs_to(
                "country", "country", "country_id", "id",
            )),
        )
        .register(EntityDef::new("country", "countries"))
        .register(EntityDef::new("post", "posts"));
    registry
}

/// In-memory database with the scenario schema and seed rows.
#[cfg(feature = "rusqlite")]
pub fn setup() -> Stitch {
    let conn = rusqlite::Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch(
        r#"
        CREATE TABLE users (id INTEGER PRIMARY KEY);
        CREATE TABLE countries (id INTEGER PRIMARY KEY);
        CREATE TABLE cities (id INTEGER PRIMARY KEY, country_id INTEGER);
        CREATE TABLE profiles (
            id INTEGER PRIMARY KEY,
            user_id INTEGER,
            country_id INTEGER,
            city_id INTEGER,
            type TEXT NOT NULL DEFAULT 'seller'
        );

        INSERT INTO users (id) VALUES (1), (2);
        INSERT INTO countries (id) VALUES (1), (2);
        INSERT INTO cities (id, country_id) VALUES (10, 1), (20, 2);
        INSERT INTO profiles (id, user_id, country_id, city_id, type) VALUES
            (1, 1, 1, 10, 'seller'),
            (2, 1, 2, 20, 'buyer');
        "#,
    )
    .expect("create schema");
    Stitch::new(conn, registry())
}
