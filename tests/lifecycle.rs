
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use keep_lists::config::{ConfigEntry, EntryData, EntryStore};
use keep_lists::config_flow::{self, ConfigFlow, FlowResult, UserInput};
use keep_lists::coordinator::TaskUpdateCoordinator;
use keep_lists::legacy::{AddToListCall, ItemsField, LegacyConfig, LegacyService};
use keep_lists::mock::MockBehaviour;
use keep_lists::todo::TodoItem;
use keep_lists::traits::TaskListApi;
use keep_lists::{Error, Integration, Session, TaskStatus};

use scenarii::{pairs, populated_server, remote_contents, EMAIL, PASSWORD};


fn input(password: &str, list_name: &str) -> UserInput {
    UserInput{ email: EMAIL.to_string(), password: password.to_string(), list_name: list_name.to_string() }
}

#[tokio::test]
async fn test_config_flow() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = populated_server();
    let flow = ConfigFlow::new(|| server.client());

    assert_eq!(flow.step_user(None).await, FlowResult::ShowForm{ step_id: "user", errors: BTreeMap::new() });

    let entry = match flow.step_user(Some(input(PASSWORD, "Groceries"))).await {
        FlowResult::CreateEntry(entry) => entry,
        other => panic!("unexpected flow result {:?}", other),
    };
    assert_eq!(entry.title, "Google Keep (Groceries)");
    assert_eq!(entry.unique_id, "gkeep_sync_Groceries");
    assert_eq!(entry.data.password, None);
    assert_eq!(entry.data.master_token, server.issued_token(EMAIL));

    let flow = ConfigFlow::new(|| server.client()).with_configured(vec![entry.unique_id.clone()]);
    assert_eq!(flow.step_user(Some(input(PASSWORD, "Groceries"))).await, FlowResult::Abort{ reason: "already_configured" });
    assert!(matches!(flow.step_user(Some(input(PASSWORD, "Chores"))).await, FlowResult::CreateEntry(_)));
}

#[tokio::test]
async fn test_config_flow_errors() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = populated_server();
    let flow = ConfigFlow::new(|| server.client());

    let mut expected = BTreeMap::new();
    expected.insert(config_flow::FIELD_PASSWORD, config_flow::ERROR_INVALID_CREDENTIALS);
    assert_eq!(
        flow.step_user(Some(input("wrong", "Groceries"))).await,
        FlowResult::ShowForm{ step_id: "user", errors: expected }
    );

    server.set_behaviour(MockBehaviour::fail_now(1));
    let mut expected = BTreeMap::new();
    expected.insert(config_flow::FIELD_BASE, config_flow::ERROR_UNKNOWN);
    assert_eq!(
        flow.step_user(Some(input(PASSWORD, "Groceries"))).await,
        FlowResult::ShowForm{ step_id: "user", errors: expected }
    );

    let mut expected = BTreeMap::new();
    expected.insert(config_flow::FIELD_PASSWORD, config_flow::ERROR_REQUIRED);
    assert_eq!(
        flow.step_user(Some(input("", "Groceries"))).await,
        FlowResult::ShowForm{ step_id: "user", errors: expected }
    );
}

#[tokio::test]
async fn test_entry_lifecycle() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = populated_server();

    let entry = ConfigEntry::new(EntryData{
        email: EMAIL.to_string(),
        password: Some(PASSWORD.to_string()),
        master_token: None,
        list_name: "Groceries".to_string(),
    });
    let entry_id = entry.entry_id.clone();

    let mut integration = Integration::new();
    integration.setup_entry(entry, server.client()).await.unwrap();

    let loaded = integration.get(&entry_id).unwrap();
    assert_eq!(loaded.entry().data.password, None);
    assert_eq!(loaded.entry().data.master_token, server.issued_token(EMAIL));

    // The first update happened during the setup
    let entity = loaded.entity();
    assert_eq!(entity.todo_items().unwrap().len(), 2);

    entity.create_todo_item(&TodoItem{ uid: None, summary: "milk".to_string(), status: TaskStatus::NeedsAction }).await.unwrap();
    entity.create_todo_item(&TodoItem{ uid: None, summary: "Bread".to_string(), status: TaskStatus::NeedsAction }).await.unwrap();
    entity.update_todo_item(&TodoItem{ uid: Some("eggs".to_string()), summary: "Eggs".to_string(), status: TaskStatus::Completed }).await.unwrap();

    assert_eq!(
        remote_contents(&server, "Groceries").unwrap(),
        pairs(&[("Milk", false), ("Eggs", true), ("Bread", false)])
    );
    let summaries: Vec<String> = entity.todo_items().unwrap().into_iter().map(|item| item.summary).collect();
    assert_eq!(summaries, vec!["Milk", "Eggs", "Bread"]);

    let session = loaded.session().clone();
    assert!(integration.unload_entry(&entry_id));
    assert!(integration.unload_entry(&entry_id) == false);
    assert!(integration.get(&entry_id).is_none());
    assert!(matches!(session.list_task_lists().await, Err(Error::SessionClosed)));
}

#[tokio::test]
async fn test_entry_not_ready() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = populated_server();
    let mut integration = Integration::new();

    let bad_password = ConfigEntry::new(EntryData{
        email: EMAIL.to_string(),
        password: Some("wrong".to_string()),
        master_token: None,
        list_name: "Groceries".to_string(),
    });
    let err = integration.setup_entry(bad_password, server.client()).await.unwrap_err();
    assert!(err.is_auth_error());

    // Login (one sync) succeeds, then the first update fails
    server.set_behaviour(MockBehaviour{ sync_behaviour: (1, 1), ..MockBehaviour::default() });
    let entry = ConfigEntry::new(EntryData{
        email: EMAIL.to_string(),
        password: Some(PASSWORD.to_string()),
        master_token: None,
        list_name: "Groceries".to_string(),
    });
    let err = integration.setup_entry(entry, server.client()).await.unwrap_err();
    assert!(matches!(err, Error::NotReady(_)));
    assert_eq!(integration.loaded_entries().count(), 0);
}

#[tokio::test]
async fn test_slow_sync_keeps_stale_data() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = populated_server();
    let session = Arc::new(Session::new(server.client(), EMAIL, Some(PASSWORD.to_string()), None));
    let coordinator = TaskUpdateCoordinator::new(session, "Groceries")
        .with_timing(Duration::from_secs(3600), Duration::from_millis(100));

    coordinator.refresh().await.unwrap();
    assert_eq!(coordinator.data().unwrap().len(), 2);

    server.set_behaviour(MockBehaviour::slow_sync(Duration::from_millis(400)));
    let err = coordinator.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Timeout(t) if t == Duration::from_millis(100)));
    assert_eq!(coordinator.last_update_success(), false);
    assert_eq!(coordinator.data().unwrap().len(), 2);

    // The timed out sync still runs on its worker thread, and holds the client meanwhile
    let err = coordinator.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
    assert_eq!(coordinator.data().unwrap().len(), 2);

    server.set_behaviour(MockBehaviour::new());
    tokio::time::sleep(Duration::from_millis(600)).await;

    coordinator.refresh().await.unwrap();
    assert!(coordinator.last_update_success());
    assert_eq!(coordinator.data().unwrap().len(), 2);
    assert_eq!(remote_contents(&server, "Groceries").unwrap(), pairs(&[("Milk", true), ("Eggs", false)]));
}

#[tokio::test]
async fn test_entries_survive_a_restart() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = populated_server();
    let folder = tempfile::tempdir().unwrap();

    let flow = ConfigFlow::new(|| server.client());
    let entry = match flow.step_user(Some(input(PASSWORD, "Chores"))).await {
        FlowResult::CreateEntry(entry) => entry,
        other => panic!("unexpected flow result {:?}", other),
    };
    let mut store = EntryStore::new(folder.path());
    store.add(entry.clone());
    store.save_to_folder().unwrap();

    // Later, the entry is loaded with its master token only
    let store = EntryStore::from_folder(folder.path()).unwrap();
    let restored = store.get(&entry.entry_id).unwrap().clone();
    assert_eq!(restored.data.password, None);

    let mut integration = Integration::new();
    integration.setup_entry(restored, server.client()).await.unwrap();
    let entity = integration.get(&entry.entry_id).unwrap().entity();
    assert_eq!(entity.todo_items(), Some(Vec::new()));
}

#[tokio::test]
async fn test_legacy_add_to_list() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = populated_server();

    let config = LegacyConfig{ username: EMAIL.to_string(), password: PASSWORD.to_string(), list_name: "Groceries".to_string() };
    let legacy = LegacyService::setup(config, server.client()).await.unwrap();

    legacy.add_to_list(AddToListCall{ name: None, items: ItemsField::Many(vec!["bread and butter".to_string(), "MILK".to_string()]) }).await.unwrap();
    assert_eq!(
        remote_contents(&server, "Groceries").unwrap(),
        pairs(&[("Milk", false), ("Eggs", false), ("bread", false), ("butter", false)])
    );

    let data = serde_json::json!({"name": "Snacks", "items": "chips and dip, soda"});
    legacy.handle_call("add_to_list", data).await.unwrap();
    assert_eq!(
        remote_contents(&server, "Snacks").unwrap(),
        pairs(&[("chips", false), ("dip", false), ("soda", false)])
    );

    assert!(matches!(legacy.handle_call("remove_from_list", serde_json::json!({})).await, Err(Error::InvalidConfig(_))));
    assert!(matches!(legacy.handle_call("add_to_list", serde_json::json!({"name": "Snacks"})).await, Err(Error::Json(_))));
    legacy.teardown();
}

#[tokio::test]
async fn test_legacy_login_failure() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = populated_server();

    let config = LegacyConfig{ username: EMAIL.to_string(), password: "wrong".to_string(), list_name: "Food Shopping".to_string() };
    assert!(matches!(LegacyService::setup(config, server.client()).await, Err(Error::InvalidCredentials)));
}
