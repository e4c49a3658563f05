//! sgit: a validation gate in front of `git commit` and `git push`.
//!
//! Before a gated command reaches git, the [`orchestrator`] runs the checks
//! its [`policy`] requires (staging, build freshness, branch checklist,
//! build-after-checklist ordering). Git is only started when every required
//! check passes or was skipped with the skip flag.

pub mod artifacts;
pub mod checklist_store;
pub mod clock;
pub mod diagnostics;
pub mod forward;
pub mod invocation;
pub mod orchestrator;
pub mod policy;
pub mod report;
pub mod skip;
pub mod validation;
pub mod vcs;

pub use artifacts::{ArtifactScanner, BinDirScanner};
pub use checklist_store::{Checklist, ChecklistError, ChecklistItem, ChecklistStore, FsChecklistStore};
pub use clock::{Clock, FixedClock, SystemClock};
pub use forward::{ForwardError, Forwarder, GitForwarder};
pub use orchestrator::{GateError, GateOutcome, GateReport, GateSettings, Orchestrator, Verdict};
pub use skip::{SkipArgError, SkipExtraction, extract_skips};
pub use validation::{Absence, Backends, CheckOutcome, CheckSettings, Evidence, ValidationResult};
pub use vcs::{ChangeKind, FileChange, GitCli, VcsError, VersionControl};
