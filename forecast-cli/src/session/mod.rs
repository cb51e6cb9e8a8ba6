//! Signed-in user state backed by the local store.
//!
//! `SessionState` is built once per process with [`SessionState::hydrate`]
//! and persists every mutation straight away, so the next invocation sees
//! the same user.

use anyhow::Context;
use thiserror::Error;

use crate::config::EmailMatching;
use crate::models::{Credential, CurrentUser};
use crate::storage::{Store, CURRENT_USER_KEY, USERS_KEY};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("An account with email {0} already exists")]
    AlreadyExists(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Signed-up users, in signup order
#[derive(Debug, Default)]
pub struct UserDirectory {
    entries: Vec<Credential>,
}

impl UserDirectory {
    /// Read the directory. Missing or malformed data yields an empty directory.
    pub fn load(store: &Store) -> anyhow::Result<Self> {
        let entries = store.get_json::<Vec<Credential>>(USERS_KEY)?;
        Ok(Self {
            entries: entries.unwrap_or_default(),
        })
    }

    pub fn save(&self, store: &Store) -> anyhow::Result<()> {
        let raw = serde_json::to_string(&self.entries).context("Failed to serialize users")?;
        store.put(USERS_KEY, &raw)
    }

    pub fn find_by_email(&self, email: &str, matching: EmailMatching) -> Option<&Credential> {
        self.entries
            .iter()
            .find(|credential| matching.matches(&credential.email, email))
    }

    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
        matching: EmailMatching,
    ) -> Option<&Credential> {
        self.entries.iter().find(|credential| {
            matching.matches(&credential.email, email) && credential.password == password
        })
    }

    pub fn push(&mut self, credential: Credential) {
        self.entries.push(credential);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.entries.iter()
    }
}

/// In-memory view of who is signed in
pub struct SessionState {
    store: Store,
    matching: EmailMatching,
    current_user: Option<CurrentUser>,
}

impl SessionState {
    /// Build the session, restoring a previously persisted user
    pub fn hydrate(store: Store, matching: EmailMatching) -> anyhow::Result<Self> {
        let current_user = store.get_json::<CurrentUser>(CURRENT_USER_KEY)?;

        if let Some(user) = &current_user {
            tracing::debug!("Restored session for {}", user.email);
        }

        Ok(Self {
            store,
            matching,
            current_user,
        })
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Register a new user and sign them in
    pub fn signup(&mut self, name: &str, email: &str, password: &str) -> AuthResult<CurrentUser> {
        let mut directory = UserDirectory::load(&self.store)?;

        if directory.find_by_email(email, self.matching).is_some() {
            tracing::info!("Signup rejected, {} already registered", email);
            return Err(AuthError::AlreadyExists(email.to_string()));
        }

        let credential = Credential::new(
            name.to_string(),
            self.matching.key(email),
            password.to_string(),
        );
        let user = credential.profile();

        directory.push(credential);
        directory.save(&self.store)?;

        self.set_current_user(user.clone())?;

        tracing::info!("Signed up {}", user.email);
        Ok(user)
    }

    /// Sign in with an existing email and password
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<CurrentUser> {
        let directory = UserDirectory::load(&self.store)?;

        let user = directory
            .authenticate(email, password, self.matching)
            .map(Credential::profile)
            .ok_or(AuthError::InvalidCredentials)?;

        self.set_current_user(user.clone())?;

        tracing::info!("Logged in as {}", user.email);
        Ok(user)
    }

    /// Forget the signed-in user. Safe to call when nobody is signed in.
    pub fn logout(&mut self) -> anyhow::Result<()> {
        self.current_user = None;
        self.store.delete(CURRENT_USER_KEY)?;
        Ok(())
    }

    fn set_current_user(&mut self, user: CurrentUser) -> anyhow::Result<()> {
        let raw = serde_json::to_string(&user).context("Failed to serialize current user")?;
        self.store.put(CURRENT_USER_KEY, &raw)?;
        self.current_user = Some(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use anyhow::Result;
    use tempfile::{tempdir, TempDir};

    fn create_test_session(matching: EmailMatching) -> Result<(SessionState, Store, TempDir)> {
        let dir = tempdir()?;
        let storage = Storage::open(dir.path())?;
        let store = storage.local()?;
        let session = SessionState::hydrate(store.clone(), matching)?;
        Ok((session, store, dir))
    }

    #[test]
    fn test_signup_sets_current_user() -> Result<()> {
        let (mut session, store, _dir) = create_test_session(EmailMatching::Exact)?;
        assert!(!session.is_authenticated());

        let user = session.signup("Ada Lovelace", "ada@uni.edu", "pw")?;
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(session.current_user(), Some(&user));

        let directory = UserDirectory::load(&store)?;
        assert_eq!(directory.len(), 1);

        let persisted = store.get(CURRENT_USER_KEY)?.unwrap();
        assert!(!persisted.contains("password"));
        Ok(())
    }

    #[test]
    fn test_duplicate_signup_leaves_directory_untouched() -> Result<()> {
        let (mut session, store, _dir) = create_test_session(EmailMatching::Exact)?;
        session.signup("Ada", "ada@uni.edu", "pw")?;
        let before = store.get(USERS_KEY)?;

        let err = session.signup("Other", "ada@uni.edu", "other").unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists(_)));
        assert_eq!(store.get(USERS_KEY)?, before);
        Ok(())
    }

    #[test]
    fn test_exact_matching_is_case_sensitive() -> Result<()> {
        let (mut session, store, _dir) = create_test_session(EmailMatching::Exact)?;
        session.signup("Ada", "ada@uni.edu", "pw")?;
        session.signup("Ada Upper", "ADA@uni.edu", "pw")?;

        assert_eq!(UserDirectory::load(&store)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_case_insensitive_matching() -> Result<()> {
        let (mut session, _store, _dir) = create_test_session(EmailMatching::CaseInsensitive)?;
        session.signup("Ada", "ada@uni.edu", "pw")?;

        let err = session.signup("Ada", " ADA@uni.edu", "pw").unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists(_)));

        session.logout()?;
        let user = session.login("Ada@Uni.edu", "pw")?;
        assert_eq!(user.email, "ada@uni.edu");
        Ok(())
    }

    #[test]
    fn test_case_insensitive_signup_stores_normalized_email() -> Result<()> {
        let (mut session, store, _dir) = create_test_session(EmailMatching::CaseInsensitive)?;
        let user = session.signup("Grace", " Grace@Uni.EDU ", "cobol")?;
        assert_eq!(user.email, "grace@uni.edu");

        let directory = UserDirectory::load(&store)?;
        assert_eq!(
            directory.iter().next().map(|c| c.email.as_str()),
            Some("grace@uni.edu")
        );
        Ok(())
    }

    #[test]
    fn test_exact_signup_keeps_email_as_typed() -> Result<()> {
        let (mut session, _store, _dir) = create_test_session(EmailMatching::Exact)?;
        let user = session.signup("Grace", "Grace@Uni.EDU", "cobol")?;
        assert_eq!(user.email, "Grace@Uni.EDU");
        Ok(())
    }

    #[test]
    fn test_login_mismatch_keeps_current_user() -> Result<()> {
        let (mut session, _store, _dir) = create_test_session(EmailMatching::Exact)?;
        let user = session.signup("Ada", "ada@uni.edu", "pw")?;

        let err = session.login("ada@uni.edu", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(session.current_user(), Some(&user));

        let err = session.login("nobody@uni.edu", "pw").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(session.current_user(), Some(&user));
        Ok(())
    }

    #[test]
    fn test_login_returns_stripped_user() -> Result<()> {
        let (mut session, store, _dir) = create_test_session(EmailMatching::Exact)?;
        let signed_up = session.signup("Ada", "ada@uni.edu", "pw")?;
        session.logout()?;

        let user = session.login("ada@uni.edu", "pw")?;
        assert_eq!(user, signed_up);
        assert!(session.is_authenticated());
        assert!(!store.get(CURRENT_USER_KEY)?.unwrap().contains("pw"));
        Ok(())
    }

    #[test]
    fn test_logout_is_idempotent() -> Result<()> {
        let (mut session, store, _dir) = create_test_session(EmailMatching::Exact)?;
        session.logout()?;
        assert!(!session.is_authenticated());

        session.signup("Ada", "ada@uni.edu", "pw")?;
        session.logout()?;
        session.logout()?;

        assert!(!session.is_authenticated());
        assert_eq!(store.get(CURRENT_USER_KEY)?, None);
        Ok(())
    }

    #[test]
    fn test_hydrate_restores_user() -> Result<()> {
        let (mut session, store, _dir) = create_test_session(EmailMatching::Exact)?;
        let user = session.signup("Ada", "ada@uni.edu", "pw")?;

        let restored = SessionState::hydrate(store, EmailMatching::Exact)?;
        assert_eq!(restored.current_user(), Some(&user));
        Ok(())
    }

    #[test]
    fn test_malformed_data_treated_as_empty() -> Result<()> {
        let (_session, store, _dir) = create_test_session(EmailMatching::Exact)?;
        store.put(USERS_KEY, "{not json")?;
        store.put(CURRENT_USER_KEY, "[1,2,3]")?;

        let mut session = SessionState::hydrate(store.clone(), EmailMatching::Exact)?;
        assert!(!session.is_authenticated());
        assert!(UserDirectory::load(&store)?.is_empty());

        session.signup("Ada", "ada@uni.edu", "pw")?;
        assert_eq!(UserDirectory::load(&store)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_non_utf8_directory_treated_as_empty() -> Result<()> {
        let (_session, store, _dir) = create_test_session(EmailMatching::Exact)?;
        store.put(USERS_KEY, [0xff, 0xfe, 0x00])?;
        store.put(CURRENT_USER_KEY, [0xff, 0xfe])?;

        let mut session = SessionState::hydrate(store.clone(), EmailMatching::Exact)?;
        assert!(!session.is_authenticated());

        let user = session.signup("Ada", "ada@uni.edu", "pw")?;
        assert_eq!(session.current_user(), Some(&user));
        assert_eq!(UserDirectory::load(&store)?.len(), 1);

        session.logout()?;
        session.login("ada@uni.edu", "pw")?;
        Ok(())
    }
}
