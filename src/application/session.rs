//! Editor session: the caller-side state around the mutation engine
//!
//! Holds the current forest snapshot together with view state that is keyed
//! by node id but never stored inside the forest: which nodes are expanded,
//! which node is being dragged, which node is being edited.

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::application::ids::IdGenerator;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{mutator, Forest, MoveRejection, Node, NodeId, Position};

/// Upper bound on generator retries when a drawn id is already taken.
const MAX_ID_ATTEMPTS: usize = 16;

/// Behavioral knobs for a session, usually taken from [`crate::config::Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Title used when `add` receives a blank title
    pub default_title: String,
    /// Expand the parent after adding a child so the child is visible
    pub expand_on_add: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_title: "Untitled".to_string(),
            expand_on_add: true,
        }
    }
}

pub struct EditorSession {
    forest: Forest,
    ids: Box<dyn IdGenerator>,
    options: SessionOptions,
    expanded: HashSet<NodeId>,
    retired: HashSet<NodeId>,
    dragging: Option<NodeId>,
    editing: Option<NodeId>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("nodes", &self.forest.node_count())
            .field("expanded", &self.expanded.len())
            .field("retired", &self.retired.len())
            .field("dragging", &self.dragging)
            .field("editing", &self.editing)
            .finish()
    }
}

impl EditorSession {
    pub fn new(forest: Forest, ids: Box<dyn IdGenerator>, options: SessionOptions) -> Self {
        Self {
            forest,
            ids,
            options,
            expanded: HashSet::new(),
            retired: HashSet::new(),
            dragging: None,
            editing: None,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn into_forest(self) -> Forest {
        self.forest
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    // ------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------

    /// Adds a node titled `title` under `parent` (or at root level) and returns its id.
    ///
    /// Blank titles fall back to the configured default title.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent: Option<&NodeId>, title: &str) -> ApplicationResult<NodeId> {
        if let Some(parent) = parent {
            if !self.forest.contains(parent) {
                return Err(ApplicationError::UnknownNode(parent.clone()));
            }
        }

        let title = match title.trim() {
            "" => self.options.default_title.clone(),
            trimmed => trimmed.to_string(),
        };
        let id = self.fresh_id()?;
        self.forest = mutator::add(&self.forest, parent, Node::new(id.clone(), title));

        if let (Some(parent), true) = (parent, self.options.expand_on_add) {
            self.expanded.insert(parent.clone());
        }
        info!("added {}", id);
        Ok(id)
    }

    fn fresh_id(&mut self) -> ApplicationResult<NodeId> {
        for attempt in 0..MAX_ID_ATTEMPTS {
            let Some(id) = self.ids.next_id() else {
                warn!("id generator exhausted");
                return Err(ApplicationError::IdExhausted { attempts: attempt });
            };
            if !id.as_str().is_empty() && !self.retired.contains(&id) && !self.forest.contains(&id)
            {
                return Ok(id);
            }
            debug!("id {} already taken, drawing again", id);
        }
        Err(ApplicationError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    /// Renames `id`. Blank input is discarded and the previous title kept.
    ///
    /// Returns whether the forest changed.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&mut self, id: &NodeId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            debug!("rename: blank title for {} suppressed", id);
            return false;
        }
        let renamed = mutator::rename(&self.forest, id, title);
        self.replace(renamed)
    }

    /// Deletes `id` and its subtree. Returns whether anything was removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &NodeId) -> bool {
        let Some(node) = self.forest.find(id) else {
            debug!("delete: {} not found", id);
            return false;
        };
        let mut removed = node.descendant_ids();
        removed.insert(id.clone());

        self.forest = mutator::delete(&self.forest, id);
        self.expanded.retain(|expanded| !removed.contains(expanded));
        if self.dragging.as_ref().is_some_and(|d| removed.contains(d)) {
            self.dragging = None;
        }
        if self.editing.as_ref().is_some_and(|e| removed.contains(e)) {
            self.editing = None;
        }
        info!("deleted {} ({} nodes)", id, removed.len());
        self.retired.extend(removed);
        true
    }

    /// Moves `dragged` next to `target`. Drag state is cleared whatever the outcome.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(
        &mut self,
        dragged: &NodeId,
        target: &NodeId,
        position: Position,
    ) -> Result<(), MoveRejection> {
        self.dragging = None;
        match mutator::move_node(&self.forest, dragged, target, position) {
            Ok(moved) => {
                self.forest = moved;
                info!("moved {} {} {}", dragged, position, target);
                Ok(())
            }
            Err(rejection) => {
                warn!("move rejected: {}", rejection);
                Err(rejection)
            }
        }
    }

    fn replace(&mut self, next: Forest) -> bool {
        if next == self.forest {
            return false;
        }
        self.forest = next;
        true
    }

    // ------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------

    /// Starts dragging `id`. Unknown ids are refused.
    pub fn begin_drag(&mut self, id: &NodeId) -> bool {
        if !self.forest.contains(id) {
            return false;
        }
        self.dragging = Some(id.clone());
        true
    }

    pub fn dragging(&self) -> Option<&NodeId> {
        self.dragging.as_ref()
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    /// Drops the node being dragged next to `target`.
    pub fn drop_on(&mut self, target: &NodeId, position: Position) -> Result<(), MoveRejection> {
        let Some(dragged) = self.dragging.take() else {
            return Err(MoveRejection::NotFound(NodeId::new("")));
        };
        self.move_node(&dragged, target, position)
    }

    // ------------------------------------------------------------
    // Edit focus
    // ------------------------------------------------------------

    pub fn begin_edit(&mut self, id: &NodeId) -> bool {
        if !self.forest.contains(id) {
            return false;
        }
        self.editing = Some(id.clone());
        true
    }

    pub fn editing(&self) -> Option<&NodeId> {
        self.editing.as_ref()
    }

    /// Applies `text` to the node being edited and leaves edit mode.
    pub fn commit_edit(&mut self, text: &str) -> bool {
        match self.editing.take() {
            Some(id) => self.rename(&id, text),
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    // ------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------

    pub fn expand(&mut self, id: &NodeId) {
        if self.forest.contains(id) {
            self.expanded.insert(id.clone());
        }
    }

    pub fn collapse(&mut self, id: &NodeId) {
        self.expanded.remove(id);
    }

    /// Flips the expansion state of `id`; returns the new state.
    pub fn toggle(&mut self, id: &NodeId) -> bool {
        if self.expanded.remove(id) {
            return false;
        }
        self.expand(id);
        self.expanded.contains(id)
    }

    /// Expands every node that has children.
    pub fn expand_all(&mut self) {
        self.expanded = self
            .forest
            .iter()
            .filter(|node| !node.is_leaf())
            .map(|node| node.id.clone())
            .collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded(&self) -> &HashSet<NodeId> {
        &self.expanded
    }
}
