/// What kind of account is pushing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserKind {
    /// A person with a display name and an e-mail address
    #[default]
    Normal,
    /// An automation account (deploy keys, bots). Its name is whatever the key
    /// was labelled with and it usually has no e-mail, so identity rules skip it.
    Service,
}

/// The authenticated account performing the push
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pusher {
    /// The login, matched against `excludeUsers`
    pub name: String,
    /// The full name, matched against committer names
    pub display_name: String,
    /// Matched against committer e-mails, identity e-mail checks are skipped
    /// without one
    pub email: Option<String>,
    pub kind: UserKind,
}

impl Pusher {
    /// A normal account.
    ///
    /// # Example
    ///
    /// ```
    /// # use yacc::{Pusher, UserKind};
    /// let pusher = Pusher::new("jsmith", "John Smith", "jsmith@example.com");
    /// assert_eq!(UserKind::Normal, pusher.kind);
    /// ```
    pub fn new<S: Into<String>>(name: S, display_name: S, email: S) -> Self {
        Pusher {
            name: name.into(),
            display_name: display_name.into(),
            email: Some(email.into()),
            kind: UserKind::Normal,
        }
    }

    /// A service account
    pub fn service<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        Pusher {
            display_name: name.clone(),
            name,
            email: None,
            kind: UserKind::Service,
        }
    }

    pub fn is_service(&self) -> bool {
        self.kind == UserKind::Service
    }
}
