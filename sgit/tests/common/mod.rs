#![allow(dead_code)]

pub mod logging;

pub use assertions::{assert_contains, assert_not_contains};
pub use fakes::{FailingVcs, FakeArtifacts, FakeChecklists, FakeVcs, RecordingForwarder};
pub use fixtures::{GateFixture, TestRepo, args};
pub use logging::init_test_logging;
