//! Segment trie for URL path patterns
//!
//! Patterns are `/`-delimited. A segment is one of:
//!
//! - a literal, matched exactly (`notify`)
//! - a placeholder starting with `:`, matching any single segment (`:id`)
//! - the wildcard `**`, matching every remaining segment, including none
//!
//! The trie only answers membership: it reports which pattern matched, it
//! does not extract parameters.

use std::collections::HashMap;

/// Pattern segment matching all remaining path segments.
pub const WILDCARD: &str = "**";

/// Prefix marking a single-segment placeholder.
pub const PLACEHOLDER_PREFIX: char = ':';

/// A node of the path trie.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    segment: String,
    static_children: HashMap<String, TrieNode>,
    dynamic_child: Option<Box<TrieNode>>,
    wildcard: bool,
    pattern: Option<String>,
}

impl TrieNode {
    fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            ..Self::default()
        }
    }

    /// The path component this node stands for.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Whether a trailing `**` was registered here.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// The pattern terminating at this node, if any.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    fn child(&self, segment: &str) -> Option<&TrieNode> {
        self.static_children
            .get(segment)
            .or(self.dynamic_child.as_deref())
    }

    fn child_mut(&mut self, segment: &str) -> &mut TrieNode {
        if segment.starts_with(PLACEHOLDER_PREFIX) {
            // One placeholder slot per node; `:id` and `:name` share it
            return self
                .dynamic_child
                .get_or_insert_with(|| Box::new(TrieNode::new(segment)));
        }

        self.static_children
            .entry(segment.to_string())
            .or_insert_with(|| TrieNode::new(segment))
    }
}

/// Prefix-segment tree over URL path patterns.
///
/// Built once, then only read; lookups are `O(segments)`.
#[derive(Debug, Clone)]
pub struct PathTrie {
    root: TrieNode,
    len: usize,
}

impl PathTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            root: TrieNode::new("/"),
            len: 0,
        }
    }

    /// Register a pattern.
    ///
    /// An empty pattern is ignored and `/` registers the root. Anything after
    /// a `**` segment is ignored. Re-adding a pattern changes nothing.
    pub fn add_pattern(&mut self, pattern: &str) {
        if pattern.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for segment in segments(pattern) {
            if segment == WILDCARD {
                node.wildcard = true;
                break;
            }
            node = node.child_mut(segment);
        }

        if node.pattern.is_none() {
            self.len += 1;
        }
        node.pattern = Some(pattern.to_string());
    }

    /// Find the pattern that matches `path`.
    ///
    /// At each node the static child wins over the placeholder child. Reaching
    /// a wildcard node ends the walk with a match.
    pub fn find(&self, path: &str) -> Option<&str> {
        let mut node = &self.root;
        for segment in segments(path) {
            if node.wildcard {
                break;
            }
            node = node.child(segment)?;
        }

        // A wildcard node always carries a pattern: registering `**` stores one
        node.pattern.as_deref()
    }

    /// Whether any registered pattern matches `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    /// Number of nodes a pattern terminates at.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no pattern is registered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }
}

impl Default for PathTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim surrounding slashes and split. `""` and `"/"` yield no segments.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_matches('/');
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}
