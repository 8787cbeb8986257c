// ABOUTME: Compile-fail test verifying a deploy cannot submit before recording history.
// ABOUTME: This test should fail to compile, validating state machine safety.

use shipctl::deploy::{Deployment, Registered};
use shipctl::orchestrator::ServiceOps;

async fn try_submit_unrecorded<O: ServiceOps>(deployment: Deployment<Registered>, orchestrator: &O) {
    // ERROR: submit() method doesn't exist on Deployment<Registered>
    let _ = deployment.submit(orchestrator).await;
}

fn main() {}
