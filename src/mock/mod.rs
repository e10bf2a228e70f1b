//! An in-memory Keep service
//!
//! [`MockServer`] plays the role of the Keep servers: it knows accounts, issues master tokens and stores notes. \
//! Every [`MockKeep`] client it hands out shares this state, so that tests can seed and inspect the "remote" data
//! while a [`Session`](crate::Session) owns the client.
#![cfg(any(test, feature = "mock"))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

mod mock_behaviour;
pub use mock_behaviour::MockBehaviour;

use crate::error::Error;
use crate::note::{KeepList, Note};
use crate::traits::KeepService;
use crate::utils::lock;


#[derive(Default, Debug)]
struct ServerState {
    /// email -> password
    accounts: HashMap<String, String>,
    /// email -> master token
    tokens: HashMap<String, String>,
    notes: Vec<Note>,
    behaviour: MockBehaviour,
    sync_count: u32,
}

/// The shared, server-side state of a mocked Keep service
#[derive(Clone, Default, Debug)]
pub struct MockServer {
    state: Arc<Mutex<ServerState>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that is allowed to log in
    pub fn add_account(&self, email: &str, password: &str) {
        lock(&self.state).accounts.insert(email.to_string(), password.to_string());
    }

    /// Add a note, as if it had been created by another client
    pub fn push_note(&self, mut note: Note) {
        note.mark_synced();
        lock(&self.state).notes.push(note);
    }

    /// Returns a copy of the notes currently stored on the server
    pub fn notes(&self) -> Vec<Note> {
        lock(&self.state).notes.clone()
    }

    /// Returns a copy of the first list that has this exact title
    pub fn list(&self, title: &str) -> Option<KeepList> {
        lock(&self.state).notes.iter()
            .filter_map(|note| note.as_list())
            .find(|list| list.title() == title)
            .cloned()
    }

    /// Returns the master token that has been issued for this account, if any
    pub fn issued_token(&self, email: &str) -> Option<String> {
        lock(&self.state).tokens.get(email).cloned()
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        lock(&self.state).behaviour = behaviour;
    }

    /// How many syncs have succeeded so far
    pub fn sync_count(&self) -> u32 {
        lock(&self.state).sync_count
    }

    /// Create a new client for this server. It is not logged in yet
    pub fn client(&self) -> MockKeep {
        MockKeep {
            server: self.clone(),
            email: None,
            master_token: None,
            notes: Vec::new(),
        }
    }
}


/// A Keep client that talks to a [`MockServer`]
#[derive(Debug)]
pub struct MockKeep {
    server: MockServer,
    email: Option<String>,
    master_token: Option<String>,
    notes: Vec<Note>,
}

impl KeepService for MockKeep {
    fn login(&mut self, email: &str, password: &str) -> Result<(), Error> {
        let token = {
            let mut state = lock(&self.server.state);
            state.behaviour.can_login()?;
            if state.accounts.get(email).map(|p| p == password) != Some(true) {
                return Err(Error::InvalidCredentials);
            }
            let token = format!("mock-master-token-{}", uuid::Uuid::new_v4().to_hyphenated());
            state.tokens.insert(email.to_string(), token.clone());
            token
        };

        self.email = Some(email.to_string());
        self.master_token = Some(token);
        self.sync()
    }

    fn master_token(&self) -> Option<String> {
        self.master_token.clone()
    }

    fn resume(&mut self, email: &str, master_token: &str) -> Result<(), Error> {
        {
            let mut state = lock(&self.server.state);
            state.behaviour.can_resume()?;
            if state.tokens.get(email).map(|t| t == master_token) != Some(true) {
                return Err(Error::InvalidCredentials);
            }
        }

        self.email = Some(email.to_string());
        self.master_token = Some(master_token.to_string());
        self.sync()
    }

    fn sync(&mut self) -> Result<(), Error> {
        if self.email.is_none() {
            return Err(Error::NotAuthenticated);
        }

        let delay = {
            let mut state = lock(&self.server.state);
            state.behaviour.can_sync()?;
            state.behaviour.sync_delay
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        let mut state = lock(&self.server.state);
        for note in self.notes.iter().filter(|note| note.is_dirty()) {
            let mut pushed = note.clone();
            pushed.mark_synced();
            match state.notes.iter_mut().find(|remote| remote.id() == note.id()) {
                Some(remote) => *remote = pushed,
                None => state.notes.push(pushed),
            }
        }
        state.sync_count += 1;
        self.notes = state.notes.clone();
        Ok(())
    }

    fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn notes_mut(&mut self) -> &mut [Note] {
        &mut self.notes
    }

    fn create_list(&mut self, title: &str) -> Result<&mut KeepList, Error> {
        lock(&self.server.state).behaviour.can_create_list()?;

        self.notes.push(Note::List(KeepList::new(title.to_string())));
        self.notes.last_mut()
            .and_then(|note| note.as_list_mut())
            .ok_or_else(|| Error::Inconsistent(format!("list {:?} has not been created", title)))
    }
}
