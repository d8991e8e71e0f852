//! Then steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use rstest_bdd_macros::then;
use stateward::task::{domain::TaskState, services::TaskLifecycleError};

fn parse_state(raw: &str) -> Result<TaskState, eyre::Report> {
    TaskState::try_from(raw).map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))
}

#[then(r#"the current state of "{identifier}" is "{state}""#)]
fn current_state_is(
    world: &LifecycleWorld,
    identifier: String,
    state: String,
) -> Result<(), eyre::Report> {
    let expected = parse_state(&state)?;
    let actual = run_async(world.service.current_state(&identifier))?;
    eyre::ensure!(
        actual == expected,
        "expected state {expected}, found {actual}"
    );
    Ok(())
}

#[then(r#"the history of "{identifier}" lists states "{states}""#)]
fn history_lists_states(
    world: &LifecycleWorld,
    identifier: String,
    states: String,
) -> Result<(), eyre::Report> {
    let expected = states
        .split(',')
        .map(parse_state)
        .collect::<Result<Vec<_>, _>>()?;
    let actual: Vec<TaskState> = run_async(world.service.history(&identifier))?
        .into_iter()
        .map(|entry| entry.state)
        .collect();
    eyre::ensure!(
        actual == expected,
        "expected history {expected:?}, found {actual:?}"
    );
    Ok(())
}

#[then(r#"only the "{state}" entry of "{identifier}" carries a service"#)]
fn only_entry_carries_service(
    world: &LifecycleWorld,
    state: String,
    identifier: String,
) -> Result<(), eyre::Report> {
    let expected = parse_state(&state)?;
    let history = run_async(world.service.history(&identifier))?;
    for entry in &history {
        eyre::ensure!(
            entry.service.is_some() == (entry.state == expected),
            "entry {} in state {} has unexpected service {:?}",
            entry.id,
            entry.state,
            entry.service
        );
    }
    Ok(())
}

#[then("the last operation fails with status {status:u16}")]
fn last_operation_fails(world: &LifecycleWorld, status: u16) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no operation was recorded"))?;
    let Err(err) = result else {
        return Err(eyre::eyre!("expected a failure, the operation succeeded"));
    };
    eyre::ensure!(
        err.status_code() == status,
        "expected status {status}, found {} ({err})",
        err.status_code()
    );
    Ok(())
}

#[then(r#"task "{identifier}" does not exist"#)]
fn task_does_not_exist(world: &LifecycleWorld, identifier: String) -> Result<(), eyre::Report> {
    let result = run_async(world.service.find_task(&identifier));
    eyre::ensure!(
        matches!(result, Err(TaskLifecycleError::NotFound(_))),
        "expected task {identifier} to be absent"
    );
    Ok(())
}
