#![allow(unused_imports)]

pub use rewatch_test_utils::builders;
pub use rewatch_test_utils::fake_supervisor::{FakeSupervisor, SupervisorCall};
pub use rewatch_test_utils::{init_tracing, with_timeout};
