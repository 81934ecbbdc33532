#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableStatus {
    Ok,
    Ko,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Allowed,
    Denied,
    Unmonitored,
}

/// Which files make it into the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileListing {
    DeniedOnly,
    All,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFile {
    pub path: String,
    pub verdict: RenderableVerdict,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub status: RenderableStatus,
    pub generated_at: String,
    pub denied_count: u32,
    pub repository: String,
    pub git_ref: String,
    pub files: Vec<RenderableFile>,
    pub pusher_name: String,
    pub pusher_email: String,
    /// Trailing diagnostic describing where the run executed.
    pub context: String,
}
