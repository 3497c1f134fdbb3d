//! When steps for task list BDD scenarios.

use super::world::{TaskListWorld, days_from_today, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskdesk::task::{
    domain::{TaskFormInput, TaskStatus},
    services::ListTasksRequest,
};

#[when(r#"the pending list is searched for "{term}""#)]
fn search_pending(world: &mut TaskListWorld, term: String) -> Result<(), eyre::Report> {
    world.listed_titles =
        world.titles_in(ListTasksRequest::new(TaskStatus::Pending).with_search(term))?;
    Ok(())
}

#[when(r#"the pending list is sorted by "{key}""#)]
fn sort_pending(world: &mut TaskListWorld, key: String) -> Result<(), eyre::Report> {
    world.listed_titles =
        world.titles_in(ListTasksRequest::new(TaskStatus::Pending).with_sort(key))?;
    Ok(())
}

#[when(r#"the task "{title}" is completed"#)]
fn complete(world: &mut TaskListWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    run_async(world.lifecycle.complete(id)).wrap_err("complete scenario task")?;
    Ok(())
}

#[when(r#"the task "{title}" is postponed"#)]
fn postpone(world: &mut TaskListWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    run_async(world.lifecycle.postpone(id)).wrap_err("postpone scenario task")?;
    Ok(())
}

#[when(r#"the task "{title}" is moved back to the pending list"#)]
fn restore(world: &mut TaskListWorld, title: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&title)?;
    run_async(world.lifecycle.restore(id)).wrap_err("restore scenario task")?;
    Ok(())
}

#[when(r#"a task "{title}" due in {days:u64} days is submitted through the add form"#)]
fn submit_add_form(
    world: &mut TaskListWorld,
    title: String,
    days: u64,
) -> Result<(), eyre::Report> {
    let category = world
        .category
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing category in scenario world"))?;
    let input = TaskFormInput {
        title: title.clone(),
        description: "Criada pelo formulario".to_owned(),
        due_date: days_from_today(days)?.format("%Y-%m-%d").to_string(),
        priority: String::new(),
        category: category.id().to_string(),
    };
    let created = run_async(world.lifecycle.create(&input)).wrap_err("submit add form")?;
    world.tasks_by_title.insert(title, created.id());
    Ok(())
}
