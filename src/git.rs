use log::error;

/// Ref prefix of branches
pub const HEADS: &str = "refs/heads/";
/// Ref prefix of tags
pub const TAGS: &str = "refs/tags/";
/// The hash git reports for a side of a ref change that does not exist
pub const ZERO_HASH: &str = "0000000000000000000000000000000000000000";

/// A git identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Person {
    /// Name, empty when it could not be parsed
    pub name: String,
    /// E-mail address, empty when it could not be parsed
    pub email: String,
}

impl Person {
    pub fn new<S: Into<String>>(name: S, email: S) -> Self {
        Person {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Parses an identity of the form `Name <email>`.
    ///
    /// Anything else gives a person with an empty name and e-mail, which the
    /// identity rules will then report as a mismatch.
    ///
    /// # Example
    ///
    /// ```
    /// # use yacc::git::Person;
    /// let person = Person::from_ident("First Last <first@example.com>");
    /// assert_eq!("First Last", person.name);
    /// assert_eq!("first@example.com", person.email);
    /// ```
    pub fn from_ident(ident: &str) -> Self {
        match regex!(r"^(.*)\s*<([^>]*)>$").captures(ident) {
            Some(caps) => Person::new(caps[1].trim(), caps[2].trim()),
            None => {
                error!("unable to parse ident: {}", ident);
                Person::default()
            }
        }
    }
}

/// A commit, or an annotated tag object, that is about to enter the repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Commit {
    /// The 40 char hash
    pub id: String,
    /// The committer, or the tagger of a tag object
    pub committer: Person,
    /// The full message without trailing newline
    pub message: String,
    /// Whether the commit has more than one parent
    pub is_merge: bool,
}

/// A convenience type for multiple commits
pub type Commits = Vec<Commit>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Branch,
    Tag,
    Other,
}

impl RefKind {
    /// Classifies a fully qualified ref by its namespace.
    pub fn of(ref_id: &str) -> Self {
        if ref_id.starts_with(HEADS) {
            RefKind::Branch
        } else if ref_id.starts_with(TAGS) {
            RefKind::Tag
        } else {
            RefKind::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Update,
    Delete,
}

/// One reference update of a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefChange {
    /// Fully qualified ref, i.e. `refs/heads/master`
    pub ref_id: String,
    pub ref_kind: RefKind,
    pub change_kind: ChangeKind,
    pub from_hash: String,
    pub to_hash: String,
}

impl RefChange {
    /// Builds a ref change from a line of pre-receive input, `<old> <new> <ref>`
    /// in terms of the two hashes and the ref. The kinds are derived from the
    /// ref namespace and the zero hash.
    ///
    /// # Example
    ///
    /// ```
    /// # use yacc::git::{ChangeKind, RefChange, RefKind, ZERO_HASH};
    /// let change = RefChange::new(ZERO_HASH, "9a1ced131648d5481e4a3f00b9c5522d466ec693", "refs/heads/feature");
    /// assert_eq!(ChangeKind::Add, change.change_kind);
    /// assert_eq!(RefKind::Branch, change.ref_kind);
    /// ```
    pub fn new<S: Into<String>>(from_hash: S, to_hash: S, ref_id: S) -> Self {
        let from_hash = from_hash.into();
        let to_hash = to_hash.into();
        let ref_id = ref_id.into();

        let change_kind = if is_zero(&from_hash) {
            ChangeKind::Add
        } else if is_zero(&to_hash) {
            ChangeKind::Delete
        } else {
            ChangeKind::Update
        };

        RefChange {
            ref_kind: RefKind::of(&ref_id),
            ref_id,
            change_kind,
            from_hash,
            to_hash,
        }
    }

    /// The ref id with the branch prefix stripped, or the full ref id for
    /// anything that isn't a branch.
    pub fn branch_name(&self) -> &str {
        self.ref_id.strip_prefix(HEADS).unwrap_or(&self.ref_id)
    }
}

fn is_zero(hash: &str) -> bool {
    !hash.is_empty() && hash.bytes().all(|b| b == b'0')
}
