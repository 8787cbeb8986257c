// ABOUTME: Compile-fail test verifying task and task definition ARNs are not interchangeable.
// ABOUTME: This test should fail to compile, validating type safety.

use shipctl::types::{TaskArn, TaskDefinitionArn};

fn takes_task_definition(_arn: TaskDefinitionArn) {}

fn main() {
    let task = TaskArn::new("arn:aws:ecs:us-east-1:123456789012:task/prod/abc");
    takes_task_definition(task); // ERROR: expected TaskDefinitionArn, found TaskArn
}
