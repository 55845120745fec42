use std::time::Duration;

use crate::UserStore;

/// Possible errors to occur while logging in or using an operation that
/// requires a logged in user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("You have to be logged in for that")]
    AuthenticationRequired,
    #[error("You're already logged in")]
    AlreadyLoggedIn,
    #[error("Incorrect login credentials")]
    AuthenticationFailed,
}

/// How many passwords a user may try per login, and how long to pause
/// between them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoginPolicy {
    pub max_attempts: u32,
    /// Waited by whoever supplies the passwords, before asking for the next one
    pub retry_delay: Duration,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::ZERO,
        }
    }
}

/// The currently logged in user, if any
///
/// Every operation that needs a logged in user takes the session explicitly
/// and calls [`Session::require`]. Failed attempts are only counted within a
/// single call to [`Session::login`], nothing is remembered across logins.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<String>,
    policy: LoginPolicy,
}

impl Session {
    /// Creates a new session without a logged in user
    pub fn new(policy: LoginPolicy) -> Self {
        Self { user: None, policy }
    }

    pub fn policy(&self) -> LoginPolicy {
        self.policy
    }

    /// The username of the logged in user
    pub fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// The username of the logged in user, or an error if nobody is logged in
    pub fn require(&self) -> Result<&str, SessionError> {
        self.current_user().ok_or(SessionError::AuthenticationRequired)
    }

    /// Tries to log in `username`
    ///
    /// Passwords are taken from `passwords` one at a time, so an interactive
    /// caller can prompt lazily. At most [`LoginPolicy::max_attempts`] passwords
    /// are consumed. The login fails right away if the user is unknown, and
    /// once all attempts are used up or `passwords` runs dry.
    pub fn login<I>(
        &mut self,
        store: &UserStore,
        username: &str,
        passwords: I,
    ) -> Result<&str, SessionError>
    where
        I: IntoIterator<Item = String>,
    {
        if self.user.is_some() {
            return Err(SessionError::AlreadyLoggedIn);
        }

        let username = username.trim();
        if store.account(username).is_none() {
            tracing::warn!(username, "login attempt for unknown user");
            return Err(SessionError::AuthenticationFailed);
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let mut passwords = passwords.into_iter();
        for attempt in 1..=max_attempts {
            let Some(password) = passwords.next() else {
                break;
            };

            if store.authenticate(username, password.trim()) {
                tracing::info!(username, "user logged in");
                return Ok(self.user.insert(username.to_string()).as_str());
            }

            tracing::warn!(username, attempt, max_attempts, "failed login attempt");
        }

        Err(SessionError::AuthenticationFailed)
    }

    /// Logs out the current user and returns their name
    pub fn logout(&mut self) -> Option<String> {
        let user = self.user.take();
        if let Some(username) = &user {
            tracing::info!(username = username.as_str(), "user logged out");
        }

        user
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::Account;

    fn store() -> UserStore {
        let mut store = UserStore::new();
        store
            .add_user("alice", Account::new("Str0ng!Pass", "a@example.com", "+491234567890", 0.).unwrap())
            .unwrap();
        store
    }

    fn attempts(passwords: &[&str]) -> Vec<String> {
        passwords.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn starts_logged_out() {
        let session = Session::default();
        assert_eq!(session.current_user(), None);
        assert_eq!(session.require(), Err(SessionError::AuthenticationRequired));
    }

    #[test]
    fn login_and_logout() {
        let store = store();
        let mut session = Session::default();

        assert_eq!(session.login(&store, " alice ", attempts(&["Str0ng!Pass"])), Ok("alice"));
        assert_eq!(session.require(), Ok("alice"));
        assert_eq!(
            session.login(&store, "alice", attempts(&["Str0ng!Pass"])),
            Err(SessionError::AlreadyLoggedIn),
        );

        assert_eq!(session.logout().as_deref(), Some("alice"));
        assert!(!session.is_logged_in());
        assert_eq!(session.logout(), None);
    }

    #[test]
    fn succeeds_within_attempt_limit() {
        let store = store();
        let mut session = Session::default();

        assert_eq!(
            session.login(&store, "alice", attempts(&["wrong", "also wrong", "Str0ng!Pass"])),
            Ok("alice"),
        );
    }

    #[test]
    fn three_wrong_passwords_fail() {
        let store = store();
        let mut session = Session::default();
        let asked = Cell::new(0);
        let passwords = std::iter::from_fn(|| {
            asked.set(asked.get() + 1);
            Some("wrong".to_string())
        });

        assert_eq!(
            session.login(&store, "alice", passwords),
            Err(SessionError::AuthenticationFailed),
        );
        assert_eq!(asked.get(), 3);
        assert!(!session.is_logged_in());

        // a later login is not locked out
        assert_eq!(session.login(&store, "alice", attempts(&["Str0ng!Pass"])), Ok("alice"));
    }

    #[test]
    fn attempt_limit_is_configurable() {
        let store = store();
        let mut session = Session::new(LoginPolicy {
            max_attempts: 1,
            ..LoginPolicy::default()
        });

        assert_eq!(
            session.login(&store, "alice", attempts(&["wrong", "Str0ng!Pass"])),
            Err(SessionError::AuthenticationFailed),
        );
    }

    #[test]
    fn unknown_user_fails_without_asking() {
        let store = store();
        let mut session = Session::default();
        let passwords = std::iter::from_fn(|| -> Option<String> { panic!("should not ask") });

        assert_eq!(
            session.login(&store, "bob", passwords),
            Err(SessionError::AuthenticationFailed),
        );
    }

    #[test]
    fn running_out_of_input_fails() {
        let store = store();
        let mut session = Session::default();

        assert_eq!(
            session.login(&store, "alice", attempts(&["wrong"])),
            Err(SessionError::AuthenticationFailed),
        );
    }
}
