use crate::error::RemoteError;

/// One remote call issued by `commit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOperation {
    Delete { image_id: String },
    Create { entry_id: String, src: String, order: i32 },
    Update { image_id: String, order: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedOperation {
    pub operation: ImageOperation,
    /// Server id touched; for creates, the id the server assigned
    pub image_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedOperation {
    pub operation: ImageOperation,
    pub error: RemoteError,
}

/// Outcome of the network phase of a commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub applied: Vec<AppliedOperation>,
    pub failed: Vec<FailedOperation>,
}

impl CommitReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.failed.is_empty()
    }

    /// Server id assigned to a created entry, if its create went through
    pub fn created_id(&self, entry_id: &str) -> Option<&str> {
        self.applied.iter().find_map(|applied| match &applied.operation {
            ImageOperation::Create { entry_id: id, .. } if id == entry_id => Some(applied.image_id.as_str()),
            _ => None,
        })
    }
}
