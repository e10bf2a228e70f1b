//! Runs this integration against an in-memory Keep service, and prints what happens to the lists.
//!
//! Use `RUST_LOG=debug` to see the reconciliation details.

use keep_lists::config::ConfigEntry;
use keep_lists::config_flow::{ConfigFlow, FlowResult, UserInput};
use keep_lists::legacy::{AddToListCall, ItemsField, LegacyConfig, LegacyService};
use keep_lists::mock::MockServer;
use keep_lists::todo::TodoItem;
use keep_lists::{Integration, KeepList, ListItem, Note, TaskStatus};

const EMAIL: &str = "me@example.com";
const PASSWORD: &str = "app_password";


#[tokio::main]
async fn main() {
    env_logger::init();

    let server = MockServer::new();
    server.add_account(EMAIL, PASSWORD);
    server.push_note(Note::List(KeepList::new_with_items(
        "groceries".to_string(),
        "Shopping List".to_string(),
        vec![
            ListItem::new_with_parameters("1".to_string(), "Milk".to_string(), true),
            ListItem::new_with_parameters("2".to_string(), "Eggs".to_string(), false),
        ],
    )));

    println!("---- before -----");
    keep_lists::utils::print_notes(&server.notes());

    let entry = match set_up_entry(&server).await {
        Some(entry) => entry,
        None => return,
    };

    let mut integration = Integration::new();
    if let Err(err) = integration.setup_entry(entry.clone(), server.client()).await {
        log::error!("Unable to set up {}: {}", entry.title, err);
        return;
    }

    if let Some(loaded) = integration.get(&entry.entry_id) {
        let entity = loaded.entity();
        for text in &["milk", "Bread"] {
            let item = TodoItem{ uid: None, summary: text.to_string(), status: TaskStatus::NeedsAction };
            if let Err(err) = entity.create_todo_item(&item).await {
                log::error!("Unable to add {}: {}", text, err);
            }
        }
        println!("---- tasks seen by the host -----");
        for item in entity.todo_items().unwrap_or_default() {
            let completion = if item.status.is_completed() { "✓" } else { " " };
            println!("    {} {}", completion, item.summary);
        }
    }
    integration.unload_entry(&entry.entry_id);

    let legacy_config = LegacyConfig{ username: EMAIL.to_string(), password: PASSWORD.to_string(), list_name: "Food Shopping".to_string() };
    match LegacyService::setup(legacy_config, server.client()).await {
        Err(err) => log::error!("Legacy service unavailable: {}", err),
        Ok(legacy) => {
            let call = AddToListCall{ name: Some("Snacks".to_string()), items: ItemsField::One("chips and dip".to_string()) };
            if let Err(err) = legacy.add_to_list(call).await {
                log::error!("add_to_list failed: {}", err);
            }
            legacy.teardown();
        },
    }

    println!("---- after -----");
    keep_lists::utils::print_notes(&server.notes());
}

async fn set_up_entry(server: &MockServer) -> Option<ConfigEntry> {
    let flow = ConfigFlow::new(|| server.client());
    let input = UserInput{ email: EMAIL.to_string(), password: PASSWORD.to_string(), list_name: "Shopping List".to_string() };
    match flow.step_user(Some(input)).await {
        FlowResult::CreateEntry(entry) => Some(entry),
        other => {
            log::error!("Setup did not complete: {:?}", other);
            None
        },
    }
}
