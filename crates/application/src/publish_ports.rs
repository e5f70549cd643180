mod deploy;
mod source_control;

pub use deploy::{DeployRequest, DeployWebhook};
pub use source_control::{SourceControl, SourceFileChange, SourceFileUpsert};
