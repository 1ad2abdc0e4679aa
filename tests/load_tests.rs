//! Load Test Runner
//!
//! Makes the stress tests under `tests/load/` discoverable by cargo test.
//!
//! The slow scenarios are marked `#[ignore]`; run them with:
//! ```bash
//! cargo test --test load_tests -- --ignored --test-threads=1
//! ```

mod load;
