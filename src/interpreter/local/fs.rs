//! In-memory filesystem backing the local interpreter

use crate::interpreter::InterpreterError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Directory(BTreeMap<String, Node>),
}

impl Node {
    fn kind(&self) -> EntryKind {
        match self {
            Node::File(_) => EntryKind::File,
            Node::Directory(_) => EntryKind::Directory,
        }
    }
}

/// Tree of directories and text files addressed by absolute `/` paths
#[derive(Debug, Clone)]
pub struct VirtualFs {
    root: Node,
}

impl VirtualFs {
    /// Filesystem containing only `/`
    pub fn new() -> Self {
        Self {
            root: Node::Directory(BTreeMap::new()),
        }
    }

    /// Resolve `path` against `cwd`, expanding `~` to `home`
    ///
    /// The result is always absolute and normalized (`.`, `..` and empty
    /// components removed). `..` at the root stays at the root.
    pub fn resolve(path: &str, cwd: &str, home: &str) -> String {
        let joined = if path == "~" {
            home.to_string()
        } else if let Some(rest) = path.strip_prefix("~/") {
            format!("{}/{}", home, rest)
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{}/{}", cwd, path)
        };
        Self::normalize(&joined)
    }

    pub fn normalize(path: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                name => parts.push(name),
            }
        }
        format!("/{}", parts.join("/"))
    }

    fn components(path: &str) -> Vec<String> {
        Self::normalize(path)
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn lookup(&self, path: &str) -> Option<&Node> {
        let mut current = &self.root;
        for name in Self::components(path) {
            match current {
                Node::Directory(children) => current = children.get(&name)?,
                Node::File(_) => return None,
            }
        }
        Some(current)
    }

    /// Children map of the directory at `path`
    fn directory_mut(
        &mut self,
        path: &str,
    ) -> Result<&mut BTreeMap<String, Node>, InterpreterError> {
        let mut current = &mut self.root;
        let mut walked = String::new();
        for name in Self::components(path) {
            let Node::Directory(children) = current else {
                return Err(InterpreterError::NotADirectory(walked));
            };
            walked.push('/');
            walked.push_str(&name);
            current = children
                .get_mut(&name)
                .ok_or_else(|| InterpreterError::NotFound(walked.clone()))?;
        }
        match current {
            Node::Directory(children) => Ok(children),
            Node::File(_) => Err(InterpreterError::NotADirectory(Self::normalize(path))),
        }
    }

    /// Split a normalized path into its parent and final component
    fn split_parent(path: &str) -> Result<(String, String), InterpreterError> {
        let normalized = Self::normalize(path);
        match normalized.rsplit_once('/') {
            Some((_, "")) | None => Err(InterpreterError::InvalidPath(path.to_string())),
            Some(("", name)) => Ok(("/".to_string(), name.to_string())),
            Some((parent, name)) => Ok((parent.to_string(), name.to_string())),
        }
    }

    pub fn kind(&self, path: &str) -> Option<EntryKind> {
        self.lookup(path).map(Node::kind)
    }

    /// Content of the file at `path`; `None` for directories and missing paths
    pub fn read_file(&self, path: &str) -> Option<&str> {
        match self.lookup(path)? {
            Node::File(content) => Some(content),
            Node::Directory(_) => None,
        }
    }

    /// Sorted entries of the directory at `path`
    pub fn list_directory(&self, path: &str) -> Option<Vec<(String, EntryKind)>> {
        match self.lookup(path)? {
            Node::Directory(children) => Some(
                children
                    .iter()
                    .map(|(name, node)| (name.clone(), node.kind()))
                    .collect(),
            ),
            Node::File(_) => None,
        }
    }

    /// Create or overwrite the file at `path`; its parent must exist
    pub fn create_file(&mut self, path: &str, content: &str) -> Result<(), InterpreterError> {
        let (parent, name) = Self::split_parent(path)?;
        let children = self.directory_mut(&parent)?;
        if let Some(Node::Directory(_)) = children.get(&name) {
            return Err(InterpreterError::AlreadyExists(Self::normalize(path)));
        }
        children.insert(name, Node::File(content.to_string()));
        Ok(())
    }

    /// Create the directory at `path` along with any missing parents
    ///
    /// An existing directory is not an error; an existing file is.
    pub fn create_directory(&mut self, path: &str) -> Result<(), InterpreterError> {
        let components = Self::components(path);
        if components.is_empty() {
            return Err(InterpreterError::InvalidPath(path.to_string()));
        }

        let mut current = &mut self.root;
        let mut walked = String::new();
        for name in components {
            let Node::Directory(children) = current else {
                return Err(InterpreterError::NotADirectory(walked));
            };
            walked.push('/');
            walked.push_str(&name);
            current = children
                .entry(name)
                .or_insert_with(|| Node::Directory(BTreeMap::new()));
        }

        match current {
            Node::Directory(_) => Ok(()),
            Node::File(_) => Err(InterpreterError::AlreadyExists(walked)),
        }
    }
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::new()
    }
}
