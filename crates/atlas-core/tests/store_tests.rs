use std::sync::Arc;

use atlas_core::{
    models::{DestinationNotes, Payload},
    AtlasError, Contribution, MemoryStore, Plan, PlanId, PlanStatus, PlanStore, SpecialistKind,
    SqliteStore,
};
use tempfile::TempDir;

/// Both stores, plus the directory backing the SQLite one.
async fn stores() -> (TempDir, Vec<(&'static str, Arc<dyn PlanStore>)>) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let sqlite = SqliteStore::open(temp_dir.path().join("plans.db"))
        .await
        .expect("Failed to open SQLite store");
    let stores: Vec<(&'static str, Arc<dyn PlanStore>)> = vec![
        ("sqlite", Arc::new(sqlite)),
        ("memory", Arc::new(MemoryStore::new())),
    ];
    (temp_dir, stores)
}

fn notes(city: &str) -> Payload {
    Payload::Destination(DestinationNotes {
        city: city.to_string(),
        summary: format!("{city} in a sentence."),
        facts: vec![format!("{city} has a river.")],
    })
}

#[tokio::test]
async fn test_create_and_get() {
    let (_temp_dir, stores) = stores().await;
    for (name, store) in stores {
        let plan = Plan::new("user-1", "Weekend in Lisbon");
        store.create(&plan).await.expect("Failed to create plan");

        let loaded = store.get(&plan.plan_id).await.expect("Failed to get plan");
        assert_eq!(loaded.plan_id, plan.plan_id, "{name}");
        assert_eq!(loaded.goal, "Weekend in Lisbon", "{name}");
        assert_eq!(loaded.status, PlanStatus::Pending, "{name}");
        assert_eq!(loaded.turn, 0, "{name}");
        assert_eq!(loaded.created_at, plan.created_at, "{name}");
    }
}

#[tokio::test]
async fn test_duplicate_create_conflicts() {
    let (_temp_dir, stores) = stores().await;
    for (name, store) in stores {
        let plan = Plan::new("user-1", "Rome");
        store.create(&plan).await.unwrap();

        let err = store.create(&plan).await.unwrap_err();
        assert!(matches!(err, AtlasError::Conflict { .. }), "{name}: {err}");
    }
}

#[tokio::test]
async fn test_missing_plan() {
    let (_temp_dir, stores) = stores().await;
    let plan_id = PlanId::from("does-not-exist");
    for (name, store) in stores {
        let err = store.get(&plan_id).await.unwrap_err();
        assert!(matches!(err, AtlasError::NotFound { .. }), "{name}: {err}");

        let err = store
            .update(&plan_id, 0, Box::new(|_plan: &mut Plan| Ok(())))
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::NotFound { .. }), "{name}: {err}");
    }
}

#[tokio::test]
async fn test_update_applies_mutation() {
    let (_temp_dir, stores) = stores().await;
    for (name, store) in stores {
        let plan = Plan::new("user-1", "Tokyo for a week");
        store.create(&plan).await.unwrap();

        let written = store
            .update(
                &plan.plan_id,
                0,
                Box::new(|plan: &mut Plan| {
                    plan.transition(PlanStatus::InProgress, "start")?;
                    plan.append_turn("more temples");
                    plan.accept(Contribution::new(1, notes("Tokyo")));
                    Ok(())
                }),
            )
            .await
            .expect("Failed to update plan");
        assert_eq!(written.turn, 1, "{name}");
        assert!(written.updated_at >= plan.updated_at, "{name}");

        let loaded = store.get(&plan.plan_id).await.unwrap();
        assert_eq!(loaded.status, PlanStatus::InProgress, "{name}");
        assert_eq!(loaded.turns.len(), 1, "{name}");
        assert_eq!(loaded.turns[0].input, "more temples", "{name}");
        assert_eq!(
            loaded.contribution(SpecialistKind::Destination),
            written.contribution(SpecialistKind::Destination),
            "{name}"
        );
    }
}

#[tokio::test]
async fn test_update_rejects_stale_turn() {
    let (_temp_dir, stores) = stores().await;
    for (name, store) in stores {
        let plan = Plan::new("user-1", "Paris");
        store.create(&plan).await.unwrap();
        store
            .update(
                &plan.plan_id,
                0,
                Box::new(|plan: &mut Plan| {
                    plan.append_turn("first");
                    Ok(())
                }),
            )
            .await
            .unwrap();

        let err = store
            .update(
                &plan.plan_id,
                0,
                Box::new(|plan: &mut Plan| {
                    plan.append_turn("second");
                    Ok(())
                }),
            )
            .await
            .unwrap_err();
        match err {
            AtlasError::ConcurrentModification {
                expected_turn,
                actual_turn,
                ..
            } => {
                assert_eq!(expected_turn, 0, "{name}");
                assert_eq!(actual_turn, 1, "{name}");
            }
            other => panic!("{name}: unexpected error {other}"),
        }

        let loaded = store.get(&plan.plan_id).await.unwrap();
        assert_eq!(loaded.turn, 1, "{name}");
        assert_eq!(loaded.turns.len(), 1, "{name}");
    }
}

#[tokio::test]
async fn test_failed_mutation_leaves_record_unchanged() {
    let (_temp_dir, stores) = stores().await;
    for (name, store) in stores {
        let plan = Plan::new("user-1", "Oslo");
        store.create(&plan).await.unwrap();

        // Pending cannot jump straight to completed
        let err = store
            .update(
                &plan.plan_id,
                0,
                Box::new(|plan: &mut Plan| {
                    plan.append_turn("done already");
                    plan.transition(PlanStatus::Completed, "finalize")
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AtlasError::InvalidState { .. }), "{name}: {err}");

        let loaded = store.get(&plan.plan_id).await.unwrap();
        assert_eq!(loaded.turn, 0, "{name}");
        assert!(loaded.turns.is_empty(), "{name}");
        assert_eq!(loaded.status, PlanStatus::Pending, "{name}");
    }
}

#[tokio::test]
async fn test_sqlite_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("plans.db");

    let plan = Plan::new("user-9", "Four nights in Rome");
    {
        let store = SqliteStore::open(&db_path).await.unwrap();
        assert_eq!(store.path(), db_path.as_path());
        store.create(&plan).await.unwrap();
        store
            .update(
                &plan.plan_id,
                0,
                Box::new(|plan: &mut Plan| {
                    plan.transition(PlanStatus::InProgress, "start")?;
                    plan.accept(Contribution::new(0, notes("Rome")));
                    Ok(())
                }),
            )
            .await
            .unwrap();
    }

    let store = SqliteStore::open(&db_path).await.unwrap();
    let loaded = store.get(&plan.plan_id).await.unwrap();
    assert_eq!(loaded.user_id, "user-9");
    assert_eq!(loaded.status, PlanStatus::InProgress);
    match &loaded.contribution(SpecialistKind::Destination).unwrap().payload {
        Payload::Destination(n) => assert_eq!(n.city, "Rome"),
        other => panic!("unexpected payload {other:?}"),
    }
}
