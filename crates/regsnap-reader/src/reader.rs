//! Depth-first walk of a registry key into a [`TreeNode`].
//!
//! For each key the reader enumerates values first, then subkeys, inserting
//! into one node in enumeration order. A subkey sharing a name with a value
//! therefore replaces it in the snapshot. Names are matched ignoring case,
//! as the registry does, and the subkey keeps its own spelling.

use regsnap_store::{KeyStore, OpenKey, StoreError};
use regsnap_types::{RegistryPath, TreeNode};

use crate::config::ReaderConfig;
use crate::error::{ReadError, ReadResult};

/// Reads snapshot trees out of a [`KeyStore`].
pub struct TreeReader<'s, S: KeyStore + ?Sized> {
    store: &'s S,
    config: ReaderConfig,
}

impl<'s, S: KeyStore + ?Sized> TreeReader<'s, S> {
    /// Reader with the default configuration.
    pub fn new(store: &'s S) -> Self {
        Self::with_config(store, ReaderConfig::default())
    }

    pub fn with_config(store: &'s S, config: ReaderConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read everything below a `HIVE\subpath` root.
    ///
    /// Fails with [`ReadError::InvalidPath`] if the hive is unknown or the
    /// root key cannot be opened.
    pub fn read(&self, root: &str) -> ReadResult<TreeNode> {
        let path =
            RegistryPath::parse(root).map_err(|e| ReadError::unparsable_root(root, e))?;
        self.read_path(&path)
    }

    /// Read everything below an already parsed root.
    pub fn read_path(&self, root: &RegistryPath) -> ReadResult<TreeNode> {
        let key = self.store.open_key(root).map_err(|e| {
            if e.is_unopenable() {
                ReadError::InvalidPath {
                    path: root.to_string(),
                    reason: e.to_string(),
                }
            } else {
                access_error(root, e)
            }
        })?;

        let tree = self.visit(key.as_ref(), 0)?;
        let stats = tree.stats();
        tracing::info!(
            root = %root,
            keys = stats.keys,
            values = stats.values,
            depth = stats.depth,
            "read complete"
        );
        Ok(tree)
    }

    fn visit(&self, key: &dyn OpenKey, depth: usize) -> ReadResult<TreeNode> {
        let path = key.path();
        let mut node = TreeNode::new();

        for raw in key.values() {
            let raw = raw.map_err(|e| access_error(path, e))?;
            let value = raw.decode();
            node.insert(raw.name, value);
        }
        let value_count = node.len();

        for name in key.subkeys() {
            let name = name.map_err(|e| access_error(path, e))?;
            let child_path = path.child(&name);

            if depth + 1 > self.config.max_depth {
                return Err(ReadError::DepthExceeded {
                    path: child_path.to_string(),
                    limit: self.config.max_depth,
                });
            }

            let child = match self.store.open_key(&child_path) {
                Ok(child) => child,
                Err(StoreError::AccessDenied(_)) if self.config.skip_inaccessible => {
                    tracing::warn!(path = %child_path, "skipping inaccessible key");
                    continue;
                }
                Err(e) => return Err(access_error(&child_path, e)),
            };

            let subtree = self.visit(child.as_ref(), depth + 1)?;
            let folded = match matching_name(&node, &name) {
                Some(existing) if existing != name => node.remove(&existing),
                _ => None,
            };
            if let Some(previous) = node.insert(name, subtree).or(folded) {
                tracing::debug!(
                    path = %child_path,
                    replaced_subtree = previous.is_subtree(),
                    "subkey name collides with an earlier entry"
                );
            }
        }

        tracing::debug!(
            path = %path,
            values = value_count,
            subkeys = node.len() - value_count,
            "visited key"
        );
        Ok(node)
    }
}

/// Read the tree below `root` with the default configuration.
pub fn read_tree<S: KeyStore + ?Sized>(store: &S, root: &str) -> ReadResult<TreeNode> {
    TreeReader::new(store).read(root)
}

/// The name already in `node` that equals `name` ignoring case.
fn matching_name(node: &TreeNode, name: &str) -> Option<String> {
    node.names()
        .find(|existing| {
            existing
                .chars()
                .flat_map(char::to_lowercase)
                .eq(name.chars().flat_map(char::to_lowercase))
        })
        .map(str::to_owned)
}

fn access_error(path: &RegistryPath, source: StoreError) -> ReadError {
    ReadError::StoreAccess {
        path: path.to_string(),
        source,
    }
}
