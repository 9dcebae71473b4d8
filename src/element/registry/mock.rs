//! Mock registry for tests.
//!
//! Records every call and answers from in-memory state. Individual endpoints can be
//! told to fail with a status code, which is mapped through the same
//! [`check_status`] as real responses.

use super::{
    check_status, BlockAck, BlockDetails, BlockPayload, MajorVersionAck, MajorVersionPayload,
    Registry, ReleasePayload, RollbackPayload,
};
use crate::error::{ElementError, Result, StateError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Categories,
    AllocateId,
    Create,
    Update,
    Major,
    Release,
    Rollback,
    Get,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login { username: String },
    Categories,
    AllocateId,
    Create(BlockPayload),
    Update(String, BlockPayload),
    Major(String, MajorVersionPayload),
    Release(String, ReleasePayload),
    Rollback(String, RollbackPayload),
    Get(String, Option<u32>),
}

pub struct MockRegistry {
    pub categories: Vec<String>,
    /// Reported by the major-version endpoint; empty means "echo the next version".
    pub active_versions: Vec<u32>,
    pub details: BlockDetails,
    valid_password: String,
    next_id: Cell<u32>,
    failures: RefCell<HashMap<Endpoint, u16>>,
    calls: RefCell<Vec<Call>>,
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            categories: vec!["Layout".to_string(), "Widgets".to_string()],
            active_versions: Vec::new(),
            details: BlockDetails::default(),
            valid_password: "hunter2".to_string(),
            next_id: Cell::new(1),
            failures: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_active_versions(mut self, versions: Vec<u32>) -> Self {
        self.active_versions = versions;
        self
    }

    pub fn with_details(mut self, details: BlockDetails) -> Self {
        self.details = details;
        self
    }

    /// Make `endpoint` answer with `status` from now on.
    pub fn fail(&self, endpoint: Endpoint, status: u16) {
        self.failures.borrow_mut().insert(endpoint, status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| endpoint_of(call) == endpoint)
            .count()
    }

    fn record(&self, call: Call, content_length: usize) -> Result<()> {
        let endpoint = endpoint_of(&call);
        self.calls.borrow_mut().push(call);
        match self.failures.borrow().get(&endpoint) {
            Some(status) => check_status(*status, "mock failure", content_length),
            None => Ok(()),
        }
    }

    fn authorize(token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(StateError::NotLoggedIn.into());
        }
        Ok(())
    }
}

fn endpoint_of(call: &Call) -> Endpoint {
    match call {
        Call::Login { .. } => Endpoint::Login,
        Call::Categories => Endpoint::Categories,
        Call::AllocateId => Endpoint::AllocateId,
        Call::Create(_) => Endpoint::Create,
        Call::Update(..) => Endpoint::Update,
        Call::Major(..) => Endpoint::Major,
        Call::Release(..) => Endpoint::Release,
        Call::Rollback(..) => Endpoint::Rollback,
        Call::Get(..) => Endpoint::Get,
    }
}

fn body_len<T: serde::Serialize>(payload: &T) -> usize {
    serde_json::to_vec(payload).map(|b| b.len()).unwrap_or(0)
}

impl Registry for MockRegistry {
    fn login(&self, username: &str, password: &str) -> Result<String> {
        self.record(
            Call::Login {
                username: username.to_string(),
            },
            0,
        )?;
        if password != self.valid_password {
            return Err(ElementError::Network {
                status: Some(403),
                message: "Wrong email or password.".to_string(),
            });
        }
        Ok(format!("token-for-{}", username))
    }

    fn categories(&self, token: &str) -> Result<Vec<String>> {
        Self::authorize(token)?;
        self.record(Call::Categories, 0)?;
        Ok(self.categories.clone())
    }

    fn allocate_block_id(&self, token: &str) -> Result<String> {
        Self::authorize(token)?;
        self.record(Call::AllocateId, 0)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Ok(format!("block-{}", id))
    }

    fn create_block(&self, token: &str, payload: &BlockPayload) -> Result<BlockAck> {
        Self::authorize(token)?;
        self.record(Call::Create(payload.clone()), body_len(payload))?;
        Ok(BlockAck {
            id: payload.id.clone(),
        })
    }

    fn update_block(&self, token: &str, id: &str, payload: &BlockPayload) -> Result<BlockAck> {
        Self::authorize(token)?;
        self.record(Call::Update(id.to_string(), payload.clone()), body_len(payload))?;
        Ok(BlockAck {
            id: Some(id.to_string()),
        })
    }

    fn create_major_version(
        &self,
        token: &str,
        id: &str,
        payload: &MajorVersionPayload,
    ) -> Result<MajorVersionAck> {
        Self::authorize(token)?;
        self.record(Call::Major(id.to_string(), payload.clone()), body_len(payload))?;
        Ok(MajorVersionAck {
            id: Some(id.to_string()),
            active_versions: self.active_versions.clone(),
            version: None,
        })
    }

    fn release_block(&self, token: &str, id: &str, payload: &ReleasePayload) -> Result<BlockAck> {
        Self::authorize(token)?;
        self.record(Call::Release(id.to_string(), payload.clone()), body_len(payload))?;
        Ok(BlockAck {
            id: Some(id.to_string()),
        })
    }

    fn rollback_block(
        &self,
        token: &str,
        id: &str,
        payload: &RollbackPayload,
    ) -> Result<BlockAck> {
        Self::authorize(token)?;
        self.record(Call::Rollback(id.to_string(), payload.clone()), body_len(payload))?;
        Ok(BlockAck {
            id: Some(id.to_string()),
        })
    }

    fn get_block(&self, token: &str, id: &str, version: Option<u32>) -> Result<BlockDetails> {
        Self::authorize(token)?;
        self.record(Call::Get(id.to_string(), version), 0)?;
        Ok(BlockDetails {
            id: id.to_string(),
            ..self.details.clone()
        })
    }
}
