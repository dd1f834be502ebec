//! Live integration tests for gamecat-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` to point at a server the
//! harness can create databases on, so they are ignored by default:
//!
//! `cargo test -p gamecat-db --test live -- --ignored`

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use gamecat_core::{
    AppId, AppListEntry, CatalogEntry, DeveloperRoles, GameFilter, PriceRange, RankEntry, Role,
};
use gamecat_db::{
    applist::{count_applist, replace_applist},
    delete_game, get_game, get_operation_time, insert_game, list_games, list_ranking,
    replace_ranking, search_games, upsert_operation_time, DbError,
};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn appid(raw: u32) -> AppId {
    AppId::new(raw).unwrap()
}

fn make_entry(raw: u32, title: &str, developer: &str, prices: &[(&str, i64)]) -> CatalogEntry {
    let mut developers = DeveloperRoles::default();
    developers.insert(Role::Developer, developer);
    developers.insert(Role::Publisher, "Devolver Digital");
    let editions: BTreeMap<String, Decimal> = prices
        .iter()
        .map(|(name, cents)| ((*name).to_string(), Decimal::new(*cents, 2)))
        .collect();
    CatalogEntry {
        appid: appid(raw),
        title: title.to_string(),
        description: Some(format!("{title} is a game.")),
        release_date: NaiveDate::from_ymd_opt(2020, 9, 17),
        developers,
        tags: vec!["Roguelike".to_string(), "Action".to_string()],
        editions,
        features: Some(vec!["Single-player".to_string()]),
    }
}

fn rank(raw: u32, title: &str) -> RankEntry {
    RankEntry {
        appid: appid(raw),
        title: title.to_string(),
    }
}

// ---------------------------------------------------------------------------
// games
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn insert_then_get_preserves_every_field(pool: sqlx::PgPool) {
    let entry = make_entry(1_145_360, "Hades", "Supergiant Games", &[("Hades", 2499)]);
    insert_game(&pool, &entry).await.expect("insert");

    let stored = get_game(&pool, entry.appid)
        .await
        .expect("get")
        .expect("row present");
    assert_eq!(stored, entry);
    assert_eq!(stored.editions["Hades"].to_string(), "24.99");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn absent_features_stay_null(pool: sqlx::PgPool) {
    let mut entry = make_entry(10, "Counter-Strike", "Valve", &[("Counter-Strike", 999)]);
    entry.features = None;
    insert_game(&pool, &entry).await.expect("insert");

    let stored = get_game(&pool, entry.appid).await.unwrap().unwrap();
    assert!(stored.features.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn duplicate_insert_is_rejected(pool: sqlx::PgPool) {
    let entry = make_entry(620, "Portal 2", "Valve", &[("Portal 2", 999)]);
    insert_game(&pool, &entry).await.expect("first insert");

    let mut again = entry.clone();
    again.title = "Portal 2 Again".to_string();
    let err = insert_game(&pool, &again).await.unwrap_err();
    assert!(matches!(err, DbError::Duplicate { appid } if appid.get() == 620));

    let stored = get_game(&pool, entry.appid).await.unwrap().unwrap();
    assert_eq!(stored.title, "Portal 2");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn delete_and_list(pool: sqlx::PgPool) {
    insert_game(&pool, &make_entry(2, "B", "Dev", &[])).await.unwrap();
    insert_game(&pool, &make_entry(1, "A", "Dev", &[])).await.unwrap();

    let titles: Vec<String> = list_games(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["A", "B"]);

    assert!(delete_game(&pool, appid(1)).await.unwrap());
    assert!(!delete_game(&pool, appid(1)).await.unwrap());
    assert_eq!(list_games(&pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn search_combines_criteria_with_or_and_price_with_and(pool: sqlx::PgPool) {
    insert_game(&pool, &make_entry(1, "Hades", "Supergiant Games", &[("Hades", 2499)]))
        .await
        .unwrap();
    insert_game(&pool, &make_entry(2, "Celeste", "Maddy Makes Games", &[("Celeste", 1999)]))
        .await
        .unwrap();
    insert_game(&pool, &make_entry(3, "Dota 2", "Valve", &[("Dota 2", 0)]))
        .await
        .unwrap();

    let or_filter = GameFilter {
        title: Some("hades".to_string()),
        developers: vec!["VALVE".to_string()],
        ..GameFilter::default()
    };
    let hits: Vec<u32> = search_games(&pool, &or_filter)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.appid.get())
        .collect();
    assert_eq!(hits, vec![1, 3]);

    let priced = GameFilter {
        title: Some("hades".to_string()),
        developers: vec!["valve".to_string()],
        price: Some(PriceRange {
            min: Some(Decimal::new(1, 0)),
            max: None,
        }),
        ..GameFilter::default()
    };
    let hits: Vec<u32> = search_games(&pool, &priced)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.appid.get())
        .collect();
    assert_eq!(hits, vec![1]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn search_treats_like_metacharacters_literally(pool: sqlx::PgPool) {
    insert_game(&pool, &make_entry(1, "100% Orange Juice", "Orange", &[]))
        .await
        .unwrap();
    insert_game(&pool, &make_entry(2, "1000 Oranges", "Orange", &[]))
        .await
        .unwrap();

    let filter = GameFilter {
        title: Some("100%".to_string()),
        ..GameFilter::default()
    };
    let hits = search_games(&pool, &filter).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].appid.get(), 1);
}

// ---------------------------------------------------------------------------
// rankings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn replace_ranking_swaps_the_whole_chart(pool: sqlx::PgPool) {
    replace_ranking(&pool, &[rank(1, "A"), rank(2, "B"), rank(3, "C")])
        .await
        .unwrap();
    replace_ranking(&pool, &[rank(9, "Z"), rank(8, "Y")])
        .await
        .unwrap();

    let ranking = list_ranking(&pool, 99).await.unwrap();
    assert_eq!(ranking, vec![rank(9, "Z"), rank(8, "Y")]);
    assert_eq!(list_ranking(&pool, 1).await.unwrap(), vec![rank(9, "Z")]);
}

// ---------------------------------------------------------------------------
// operation timestamps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn operation_time_upserts(pool: sqlx::PgPool) {
    assert!(get_operation_time(&pool, "last_top_games_update")
        .await
        .unwrap()
        .is_none());

    let earlier = Utc::now() - Duration::hours(3);
    upsert_operation_time(&pool, "last_top_games_update", earlier)
        .await
        .unwrap();
    let later = Utc::now();
    upsert_operation_time(&pool, "last_top_games_update", later)
        .await
        .unwrap();

    let stored = get_operation_time(&pool, "last_top_games_update")
        .await
        .unwrap()
        .unwrap();
    assert!((stored - later).num_milliseconds().abs() < 1);
}

// ---------------------------------------------------------------------------
// applist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn replace_applist_overwrites_mirror(pool: sqlx::PgPool) {
    let first = vec![
        AppListEntry {
            appid: 10,
            name: "Counter-Strike".to_string(),
        },
        AppListEntry {
            appid: 20,
            name: "Team Fortress Classic".to_string(),
        },
    ];
    assert_eq!(replace_applist(&pool, &first).await.unwrap(), 2);

    let second = vec![AppListEntry {
        appid: 30,
        name: "Day of Defeat".to_string(),
    }];
    assert_eq!(replace_applist(&pool, &second).await.unwrap(), 1);
    assert_eq!(count_applist(&pool).await.unwrap(), 1);
}
