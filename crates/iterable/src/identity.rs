//! API key and user identity attached to every request.

use crate::builders::EventRequestBuilder;
use crate::types::{keys, EventPayload, LaunchContext, PushServicePlatform};
use crate::{Email, Error, UserId};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

static SHARED: RwLock<Option<Arc<IdentityContext>>> = RwLock::new(None);

/// The user events are attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentity {
    Email(Email),
    UserId(UserId),
}

impl UserIdentity {
    /// Body key the identity is sent under.
    pub fn key(&self) -> &'static str {
        match self {
            UserIdentity::Email(_) => keys::EMAIL,
            UserIdentity::UserId(_) => keys::USER_ID,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserIdentity::Email(e) => e.as_str(),
            UserIdentity::UserId(id) => id.as_str(),
        }
    }
}

impl From<Email> for UserIdentity {
    fn from(e: Email) -> Self {
        UserIdentity::Email(e)
    }
}

impl From<UserId> for UserIdentity {
    fn from(id: UserId) -> Self {
        UserIdentity::UserId(id)
    }
}

/// Identity attached to every tracked event.
///
/// Fields are fixed at construction; to switch users, build a new context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    api_key: String,
    user: UserIdentity,
    environment: PushServicePlatform,
}

/// Result of [`IdentityContext::create_shared`].
#[derive(Debug, Clone)]
pub struct SharedInit {
    /// The instance now installed as the shared identity.
    pub identity: Arc<IdentityContext>,
    /// Push-open event to deliver when the process was launched from a push.
    pub launch_push_open: Option<EventPayload>,
}

impl IdentityContext {
    /// Create an identity for a user known by email.
    pub fn create(api_key: impl Into<String>, user_email: impl Into<String>) -> Result<Self, Error> {
        Self::with_user(api_key, Email(user_email.into()))
    }

    /// Create an identity for a user known by user ID.
    pub fn create_with_user_id(
        api_key: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::with_user(api_key, UserId(user_id.into()))
    }

    /// Create an identity from an [`Email`] or [`UserId`].
    ///
    /// ```rust
    /// use iterable::{email, user_id, IdentityContext};
    ///
    /// let by_email = IdentityContext::with_user("api_key", email("user@example.com")).unwrap();
    /// let by_id = IdentityContext::with_user("api_key", user_id("usr_1")).unwrap();
    /// assert_eq!(by_email.email(), Some("user@example.com"));
    /// assert_eq!(by_id.user_id(), Some("usr_1"));
    /// ```
    pub fn with_user(
        api_key: impl Into<String>,
        user: impl Into<UserIdentity>,
    ) -> Result<Self, Error> {
        Self::new(api_key.into(), user.into(), PushServicePlatform::default())
    }

    pub(crate) fn new(
        api_key: String,
        user: UserIdentity,
        environment: PushServicePlatform,
    ) -> Result<Self, Error> {
        if api_key.is_empty() {
            return Err(Error::invalid("api_key cannot be empty"));
        }
        if user.as_str().is_empty() {
            return Err(Error::invalid(format!("{} cannot be empty", user.key())));
        }

        Ok(Self {
            api_key,
            user,
            environment,
        })
    }

    /// Create an identity and install it as the process-wide shared instance.
    ///
    /// Any previously shared instance is replaced. Concurrent callers race and
    /// the last writer wins; readers never observe a partially replaced value.
    ///
    /// When `launch` says the process was opened from a push notification, the
    /// matching push-open event is built and returned for delivery.
    pub fn create_shared(
        api_key: impl Into<String>,
        user_email: impl Into<String>,
        launch: Option<&LaunchContext>,
    ) -> Result<SharedInit, Error> {
        Self::create(api_key, user_email)?.install_shared(launch)
    }

    /// Install this identity as the shared instance.
    ///
    /// See [`IdentityContext::create_shared`].
    pub fn install_shared(self, launch: Option<&LaunchContext>) -> Result<SharedInit, Error> {
        let identity = Arc::new(self);

        let launch_push_open = match launch.and_then(|l| l.remote_notification.as_ref()) {
            Some(user_info) => {
                debug!("launched from push notification");
                Some(identity.requests().push_open(user_info, &Default::default())?)
            }
            None => None,
        };

        let mut slot = SHARED.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(identity.clone());
        drop(slot);

        info!(identity_key = identity.user.key(), "shared identity installed");

        Ok(SharedInit {
            identity,
            launch_push_open,
        })
    }

    /// Get the shared instance installed by [`IdentityContext::create_shared`].
    pub fn shared() -> Result<Arc<IdentityContext>, Error> {
        SHARED
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(Error::NotInitialized)
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the user identity.
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Get the user's email, if the identity is email based.
    pub fn email(&self) -> Option<&str> {
        match &self.user {
            UserIdentity::Email(e) => Some(e.as_str()),
            UserIdentity::UserId(_) => None,
        }
    }

    /// Get the user ID, if the identity is user ID based.
    pub fn user_id(&self) -> Option<&str> {
        match &self.user {
            UserIdentity::UserId(id) => Some(id.as_str()),
            UserIdentity::Email(_) => None,
        }
    }

    /// Get the push service environment.
    pub fn environment(&self) -> PushServicePlatform {
        self.environment
    }

    /// Request builder bound to this identity.
    pub fn requests(&self) -> EventRequestBuilder<'_> {
        EventRequestBuilder::new(self)
    }
}
