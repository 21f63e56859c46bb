//! Test utilities for roletools_core tests.
//!
//! Provides a recording mock platform and helpers to build a service over
//! an in-memory store.

#![allow(dead_code)]

use async_trait::async_trait;
use roletools_core::{
    ButtonRequest, ButtonRequestBuilder, ButtonStyle, ChannelId, ChannelInfo, FetchedMessage,
    GuildId, MemoryStore, MessageId, MessageKey, Platform, PlatformResult, RenderedView, RoleId,
    RoleInfo, RoleTools, UserId,
};
use roletools_error::{PlatformError, PlatformErrorKind};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Guild used throughout the tests.
pub const GUILD: GuildId = GuildId(1);
/// Channel used throughout the tests.
pub const CHANNEL: ChannelId = ChannelId(500);
/// The mock bot's own user id.
pub const BOT: UserId = UserId(999);
/// A member activating controls.
pub const MEMBER: UserId = UserId(42);

/// First test role.
pub const R1: RoleId = RoleId(11);
/// Second test role.
pub const R2: RoleId = RoleId(12);
/// Third test role.
pub const R3: RoleId = RoleId(13);

/// A role change the mock recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCall {
    Add(UserId, RoleId),
    Remove(UserId, RoleId),
}

/// A message the mock was asked to send.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub key: MessageKey,
    pub content: Option<String>,
    pub view: RenderedView,
}

/// Observable and configurable state of the mock.
#[derive(Debug, Default)]
pub struct MockState {
    pub sent: Vec<SentMessage>,
    pub edits: Vec<(MessageKey, RenderedView)>,
    pub role_calls: Vec<RoleCall>,
    /// Existing messages and their authors
    pub messages: HashMap<MessageKey, UserId>,
    pub fetch_errors: HashMap<MessageKey, PlatformErrorKind>,
    pub missing_channels: HashSet<ChannelId>,
    pub edit_error: Option<PlatformErrorKind>,
    pub role_error: Option<PlatformErrorKind>,
    pub member_roles: HashMap<UserId, HashSet<RoleId>>,
}

/// Recording platform double.
#[derive(Debug)]
pub struct MockPlatform {
    roles: Vec<RoleInfo>,
    next_message: AtomicU64,
    state: Mutex<MockState>,
}

impl MockPlatform {
    /// Platform knowing roles 11..=60, named `Role 11` and so on.
    pub fn new() -> Self {
        let roles = (11..=60)
            .map(|id| RoleInfo::new(RoleId(id), format!("Role {id}")))
            .collect();
        Self {
            roles,
            next_message: AtomicU64::new(1000),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Inspect or reconfigure the mock.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    /// Register an existing message authored by `author`.
    pub fn add_message(&self, key: MessageKey, author: UserId) {
        self.state().messages.insert(key, author);
    }

    /// Make fetching a message fail with the given kind.
    pub fn fail_fetch(&self, key: MessageKey, kind: PlatformErrorKind) {
        self.state().fetch_errors.insert(key, kind);
    }

    /// Roles the member currently holds.
    pub fn member_roles(&self, user: UserId) -> HashSet<RoleId> {
        self.state()
            .member_roles
            .get(&user)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of messages sent so far.
    pub fn sent_count(&self) -> usize {
        self.state().sent.len()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn current_user_id(&self) -> PlatformResult<UserId> {
        Ok(BOT)
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        content: Option<&str>,
        view: &RenderedView,
    ) -> PlatformResult<MessageKey> {
        let id = self.next_message.fetch_add(1, Ordering::SeqCst);
        let key = MessageKey::new(channel_id, MessageId(id));
        let mut state = self.state();
        state.messages.insert(key, BOT);
        state.sent.push(SentMessage {
            key,
            content: content.map(str::to_string),
            view: view.clone(),
        });
        Ok(key)
    }

    async fn edit_message(&self, key: MessageKey, view: &RenderedView) -> PlatformResult<()> {
        let mut state = self.state();
        if let Some(kind) = state.edit_error.clone() {
            return Err(PlatformError::new(kind));
        }
        state.edits.push((key, view.clone()));
        Ok(())
    }

    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> PlatformResult<FetchedMessage> {
        let key = MessageKey::new(channel_id, message_id);
        let state = self.state();
        if let Some(kind) = state.fetch_errors.get(&key) {
            return Err(PlatformError::new(kind.clone()));
        }
        state
            .messages
            .get(&key)
            .map(|author| FetchedMessage {
                key,
                author_id: *author,
            })
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::NotFound("Unknown Message".into())))
    }

    async fn roles(&self, _guild_id: GuildId) -> PlatformResult<Vec<RoleInfo>> {
        Ok(self.roles.clone())
    }

    async fn channel(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
    ) -> PlatformResult<Option<ChannelInfo>> {
        if self.state().missing_channels.contains(&channel_id) {
            return Ok(None);
        }
        Ok(Some(ChannelInfo {
            id: channel_id,
            name: format!("channel-{channel_id}"),
        }))
    }

    async fn add_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        _reason: &str,
    ) -> PlatformResult<()> {
        let mut state = self.state();
        if let Some(kind) = state.role_error.clone() {
            return Err(PlatformError::new(kind));
        }
        state.role_calls.push(RoleCall::Add(user_id, role_id));
        state.member_roles.entry(user_id).or_default().insert(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
        _reason: &str,
    ) -> PlatformResult<()> {
        let mut state = self.state();
        if let Some(kind) = state.role_error.clone() {
            return Err(PlatformError::new(kind));
        }
        state.role_calls.push(RoleCall::Remove(user_id, role_id));
        state.member_roles.entry(user_id).or_default().remove(&role_id);
        Ok(())
    }
}

/// Service over a fresh in-memory store and mock platform.
pub fn service() -> (RoleTools, Arc<MockPlatform>, Arc<MemoryStore>) {
    let platform = Arc::new(MockPlatform::new());
    let store = Arc::new(MemoryStore::new());
    let service = RoleTools::new(store.clone(), platform.clone());
    (service, platform, store)
}

/// Button request with defaults.
pub fn button_request(name: &str, role: RoleId) -> ButtonRequest {
    ButtonRequestBuilder::default()
        .name(name)
        .role_id(role)
        .build()
        .expect("valid button request")
}

/// Button request with an explicit style.
pub fn styled_button_request(name: &str, role: RoleId, style: ButtonStyle) -> ButtonRequest {
    ButtonRequestBuilder::default()
        .name(name)
        .role_id(role)
        .style(style)
        .build()
        .expect("valid button request")
}
