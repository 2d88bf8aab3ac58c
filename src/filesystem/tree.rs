use derive_more::Display;

/// Kind of a node in a tree listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("dir")]
    Directory,
}

/// One node of a remote or local tree.
///
/// `path` is relative to the root of the listing and always uses `/` as the
/// separator, whatever the host platform is. Directory entries are only ever
/// traversed, never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn file(parent: &str, name: impl Into<String>) -> Self {
        Self::new(parent, name, EntryKind::File)
    }

    pub fn directory(parent: &str, name: impl Into<String>) -> Self {
        Self::new(parent, name, EntryKind::Directory)
    }

    fn new(parent: &str, name: impl Into<String>, kind: EntryKind) -> Self {
        let name = name.into();
        let path = join_remote(parent, &name);
        Self { name, path, kind }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Joins two remote path fragments with a single `/`.
///
/// Leading and trailing separators of the fragments are dropped, so an empty
/// parent yields `name` unchanged.
pub fn join_remote(parent: &str, name: &str) -> String {
    let parent = parent.trim_matches('/');
    let name = name.trim_matches('/');

    match (parent.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{parent}/{name}"),
    }
}
