//! Then steps for task list BDD scenarios.

use super::world::{TaskListWorld, status_named};
use rstest_bdd_macros::then;
use taskdesk::task::services::ListTasksRequest;

#[then(r#"the listed titles are "{expected}""#)]
fn listed_titles_are(world: &TaskListWorld, expected: String) -> Result<(), eyre::Report> {
    let expected_titles: Vec<&str> = expected.split(", ").collect();
    eyre::ensure!(
        world.listed_titles == expected_titles,
        "expected titles {expected_titles:?}, found {:?}",
        world.listed_titles
    );
    Ok(())
}

#[then(r#"the "{status}" list is empty"#)]
fn list_is_empty(world: &TaskListWorld, status: String) -> Result<(), eyre::Report> {
    let titles = world.titles_in(ListTasksRequest::new(status_named(&status)?))?;
    eyre::ensure!(titles.is_empty(), "expected no tasks, found {titles:?}");
    Ok(())
}

#[then(r#"the "{status}" list contains "{title}""#)]
fn list_contains(
    world: &TaskListWorld,
    status: String,
    title: String,
) -> Result<(), eyre::Report> {
    let titles = world.titles_in(ListTasksRequest::new(status_named(&status)?))?;
    eyre::ensure!(
        titles.contains(&title),
        "expected {title} in the {status} list, found {titles:?}"
    );
    Ok(())
}
