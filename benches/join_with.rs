//! Join-fetch vs one follow-up query per relation.

use criterion::{Criterion, criterion_group, criterion_main};
use rusqlite::OptionalExtension;
use std::hint::black_box;
use stitch::prelude::*;

const USERS: i64 = 200;

fn setup() -> Stitch {
    let mut registry = Registry::new();
    registry
        .register(
            EntityDef::new("user", "users")
                .relation(RelationDef::has_one("profile", "profile", "user_id", "id")),
        )
        .register(EntityDef::new("profile", "profiles"));

    let conn = rusqlite::Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch(
        r#"
        CREATE TABLE users (id INTEGER PRIMARY KEY);
        CREATE TABLE profiles (
            id INTEGER PRIMARY KEY,
            user_id INTEGER,
            type TEXT NOT NULL DEFAULT 'seller'
        );
        "#,
    )
    .expect("create schema");
    for id in 1..=USERS {
        conn.execute("INSERT INTO users (id) VALUES (?1)", [id])
            .expect("seed user");
        // Every other user has a profile, so both hydration branches run.
        if id % 2 == 0 {
            conn.execute(
                "INSERT INTO profiles (id, user_id) VALUES (?1, ?1)",
                [id],
            )
            .expect("seed profile");
        }
    }
    Stitch::new(conn, registry)
}

fn bench_join_with(c: &mut Criterion) {
    let db = setup();

    c.bench_function("join_with_fetch", |b| {
        b.iter(|| {
            let users = db.fetch("user").join_with("profile").all().unwrap();
            assert_eq!(users.len(), USERS as usize);
            black_box(users)
        })
    });

    c.bench_function("separate_query_per_relation", |b| {
        b.iter(|| {
            let users = db.fetch("user").all().unwrap();
            let mut loaded = Vec::with_capacity(users.len());
            for mut user in users {
                let id = user.attr("id").and_then(SqlValue::as_integer).unwrap();
                let profile_id: Option<i64> = db
                    .conn()
                    .query_row(
                        "SELECT id FROM profiles WHERE user_id = ?1 LIMIT 1",
                        [id],
                        |row| row.get(0),
                    )
                    .optional()
                    .unwrap();
                match profile_id {
                    Some(profile_id) => {
                        let profile = db.fetch("profile").one(profile_id).unwrap();
                        user.set_relation("profile", profile);
                    }
                    None => user.set_relation("profile", None),
                }
                loaded.push(user);
            }
            black_box(loaded)
        })
    });
}

criterion_group!(benches, bench_join_with);
criterion_main!(benches);
