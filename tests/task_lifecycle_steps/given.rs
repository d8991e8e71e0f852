//! Given steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use stateward::task::services::CreateTaskRequest;

#[given(r#"a task "{identifier}" named "{name}" created in state "{state}""#)]
fn task_created(
    world: &mut LifecycleWorld,
    identifier: String,
    name: String,
    state: String,
) -> Result<(), eyre::Report> {
    run_async(
        world
            .service
            .create_task(CreateTaskRequest::new(name, identifier, state)),
    )
    .wrap_err("create task for scenario setup")?;
    Ok(())
}
