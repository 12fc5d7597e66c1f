use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::types::Pose;

/// A static model that can ride along with a link.
///
/// The link only holds a shared reference; it never controls the model's
/// lifetime.
pub trait StaticModel: Send + Sync {
    fn name(&self) -> &str;

    /// Called whenever the carrying link moves.
    fn set_world_pose(&self, pose: Pose);
}

/// Minimal [`StaticModel`] that records its last world pose.
pub struct StaticModelHandle {
    name: String,
    pose: Mutex<Pose>,
}

impl StaticModelHandle {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            pose: Mutex::new(Pose::default()),
        })
    }

    pub fn world_pose(&self) -> Pose {
        *self.pose.lock()
    }
}

impl StaticModel for StaticModelHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_world_pose(&self, pose: Pose) {
        *self.pose.lock() = pose;
    }
}

impl fmt::Debug for StaticModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticModelHandle")
            .field("name", &self.name)
            .field("pose", &self.world_pose())
            .finish()
    }
}

#[derive(Clone)]
pub struct Attachment {
    pub model: Arc<dyn StaticModel>,
    /// Pose of the model relative to the link frame.
    pub offset: Pose,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("model", &self.model.name())
            .field("offset", &self.offset)
            .finish()
    }
}

/// Static models attached to one link, in attachment order.
#[derive(Debug, Clone, Default)]
pub struct AttachmentTable {
    entries: Vec<Attachment>,
}

impl AttachmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends without deduplication; the caller owns that policy.
    pub fn attach(&mut self, model: Arc<dyn StaticModel>, offset: Pose) {
        self.entries.push(Attachment { model, offset });
    }

    /// Removes the first attachment whose model has `name`.
    pub fn detach(&mut self, name: &str) -> Option<Attachment> {
        let index = self.entries.iter().position(|a| a.model.name() == name)?;
        Some(self.entries.remove(index))
    }

    pub fn detach_all(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attachment> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|a| a.model.name().to_string()).collect()
    }

    /// Moves every attached model to `link_pose ∘ offset`.
    pub fn follow(&self, link_pose: &Pose) {
        for attachment in &self.entries {
            attachment
                .model
                .set_world_pose(link_pose.compose(&attachment.offset));
        }
    }
}
