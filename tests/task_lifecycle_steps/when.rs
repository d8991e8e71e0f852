//! When steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use rstest_bdd_macros::when;
use serde_json::json;
use stateward::task::services::{ChangeStateRequest, CreateTaskRequest};

#[when(r#"task "{identifier}" moves to "{state}""#)]
fn task_moves(world: &mut LifecycleWorld, identifier: String, state: String) {
    let result = run_async(
        world
            .service
            .change_state(&identifier, ChangeStateRequest::new(state)),
    );
    world.record(result);
}

#[when(r#"task "{identifier}" records a call to "{url}" while moving to "{state}""#)]
fn task_moves_with_call(
    world: &mut LifecycleWorld,
    identifier: String,
    url: String,
    state: String,
) {
    let request = ChangeStateRequest::new(state)
        .with_service(json!({"type": "http", "upstream_url": url}));
    let result = run_async(world.service.change_state(&identifier, request));
    world.record(result);
}

#[when(r#"another task "{identifier}" named "{name}" is created in state "{state}""#)]
fn another_task_created(
    world: &mut LifecycleWorld,
    identifier: String,
    name: String,
    state: String,
) {
    let result = run_async(
        world
            .service
            .create_task(CreateTaskRequest::new(name, identifier, state)),
    );
    world.record(result);
}

#[when(r#"task "{identifier}" is created with service type "{kind}""#)]
fn task_created_with_service(world: &mut LifecycleWorld, identifier: String, kind: String) {
    let request = CreateTaskRequest::new("T", identifier, "init").with_service(json!({"type": kind}));
    let result = run_async(world.service.create_task(request));
    world.record(result);
}
