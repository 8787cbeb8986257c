// ABOUTME: Compile-fail test verifying a deploy cannot be marked deployed while still rolling out.
// ABOUTME: This test should fail to compile, validating state machine safety.

use shipctl::deploy::{Deployment, Submitted};
use shipctl::history::HistoryStore;

async fn try_early_mark(deployment: Deployment<Submitted>, history: &HistoryStore) {
    // ERROR: mark_deployed() method doesn't exist on Deployment<Submitted>
    let _ = deployment.mark_deployed(history).await;
}

fn main() {}
