use project_graph::dataset::{integrity, TASKS, TEAMS};
use project_graph_sdk::{
    verify, DatabaseUser, Dataset, DocumentClient, EmbeddedClient, SeedError, Seeder, COLLECTIONS,
};
use serde_json::{json, Value};

const DATABASE: &str = "project_graph";

fn bootstrap_user() -> DatabaseUser {
    DatabaseUser::new("root", "arango2rdb")
}

async fn seed(client: &EmbeddedClient) {
    Seeder::new(client, DATABASE, bootstrap_user())
        .run()
        .await
        .unwrap();
}

async fn keys(client: &EmbeddedClient, collection: &str) -> Vec<String> {
    let mut keys: Vec<String> = client
        .read_documents(DATABASE, collection, None)
        .await
        .unwrap()
        .iter()
        .filter_map(|d| d["_key"].as_str().map(String::from))
        .collect();
    keys.sort();
    keys
}

/// Documents of a collection without revisions, sorted by key
async fn contents(client: &EmbeddedClient, collection: &str) -> Vec<Value> {
    let mut docs = client.read_documents(DATABASE, collection, None).await.unwrap();
    for doc in docs.iter_mut() {
        if let Some(map) = doc.as_object_mut() {
            map.remove("_rev");
        }
    }
    docs.sort_by(|a, b| a["_key"].as_str().cmp(&b["_key"].as_str()));
    docs
}

#[tokio::test]
async fn test_fresh_run_creates_database() {
    let client = EmbeddedClient::new();
    seed(&client).await;

    let databases = client.list_databases().await.unwrap();
    assert!(databases.contains(&DATABASE.to_string()));
    assert_eq!(keys(&client, TEAMS).await, vec!["team-design", "team-dev"]);

    let store = client.store_read().await;
    let users = store.database(DATABASE).unwrap().users();
    assert_eq!(users, &[bootstrap_user()]);
}

#[tokio::test]
async fn test_all_collections_populated() {
    let client = EmbeddedClient::new();
    seed(&client).await;

    let mut counts = Vec::new();
    for name in COLLECTIONS {
        counts.push(client.count_documents(DATABASE, name).await.unwrap());
    }
    assert_eq!(counts, vec![2, 4, 2, 2, 4, 4, 2]);

    let listed: Vec<String> = client
        .list_collections(DATABASE)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(listed, COLLECTIONS.iter().map(|c| c.to_string()).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_references_resolve_after_seeding() {
    let client = EmbeddedClient::new();
    seed(&client).await;

    let mut stored = Dataset::default();
    for name in COLLECTIONS {
        for doc in client.read_documents(DATABASE, name, None).await.unwrap() {
            stored.push_document(name, doc).unwrap();
        }
    }
    assert!(integrity::check(&stored).is_empty());

    let report = verify(&client, DATABASE, &Dataset::sample()).await.unwrap();
    assert!(report.is_ok(), "{report:?}");
}

#[tokio::test]
async fn test_rerun_removes_stale_tasks() {
    let client = EmbeddedClient::new();
    seed(&client).await;

    client
        .insert_document(DATABASE, TASKS, &json!({"_key": "task-stale", "name": "Old"}))
        .await
        .unwrap();
    assert_eq!(client.count_documents(DATABASE, TASKS).await.unwrap(), 5);

    let report = Seeder::new(&client, DATABASE, bootstrap_user())
        .run()
        .await
        .unwrap();
    assert!(!report.database_created);
    assert_eq!(report.collections[4].removed, 5);
    assert_eq!(
        keys(&client, TASKS).await,
        vec!["task-dashboard", "task-data-model", "task-onboarding-flow", "task-style-guide"]
    );
}

#[tokio::test]
async fn test_two_runs_yield_identical_contents() {
    let client = EmbeddedClient::new();
    seed(&client).await;

    let mut first = Vec::new();
    for name in COLLECTIONS {
        first.push(contents(&client, name).await);
    }

    seed(&client).await;

    for (name, before) in COLLECTIONS.iter().zip(first) {
        assert_eq!(contents(&client, name).await, before, "{name} changed");
    }
}

#[tokio::test]
async fn test_existing_database_is_kept() {
    let client = EmbeddedClient::new();
    client
        .create_database(DATABASE, &[DatabaseUser::new("ops", "secret")])
        .await
        .unwrap();
    client.create_collection(DATABASE, "audit_log").await.unwrap();

    let report = Seeder::new(&client, DATABASE, bootstrap_user())
        .run()
        .await
        .unwrap();
    assert!(!report.database_created);

    // Unrelated collections and the existing users are untouched.
    assert!(client.collection_exists(DATABASE, "audit_log").await.unwrap());
    let store = client.store_read().await;
    let users = store.database(DATABASE).unwrap().users();
    assert_eq!(users, &[DatabaseUser::new("ops", "secret")]);
}

#[tokio::test]
async fn test_duplicate_key_aborts_run() {
    let client = EmbeddedClient::new();
    let mut dataset = Dataset::sample();
    let duplicate = dataset.members[0].clone();
    dataset.members.push(duplicate);

    let err = Seeder::new(&client, DATABASE, bootstrap_user())
        .with_dataset(dataset)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::Insert { ref collection, .. } if collection == "members"));

    // Nothing after the failing collection was created.
    assert!(!client.collection_exists(DATABASE, "projects").await.unwrap());
}
