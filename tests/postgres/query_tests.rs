//! Search, filter and ordering against `PostgreSQL`.

use super::helpers::{PgTestContext, category, date, pending_task, pg_context};
use rstest::rstest;
use taskdesk::task::{
    domain::{Category, Priority, Task, TaskQuery, TaskSort, TaskStatus},
    ports::{CategoryRepository, TaskRepository},
};

struct Seeded {
    work: Category,
    leisure: Category,
}

async fn seed(context: &PgTestContext) -> Seeded {
    let work = category("Trabalho");
    let leisure = category("Lazer");
    for entry in [&work, &leisure] {
        context
            .repository
            .store_category(entry)
            .await
            .expect("category store should succeed");
    }
    let tasks = [
        pending_task(
            "Enviar email urgente",
            date(2026, 10, 19),
            Priority::High,
            work.id(),
        ),
        pending_task(
            "Planejar ferias",
            date(2026, 10, 19),
            Priority::Low,
            leisure.id(),
        ),
        pending_task("Media", date(2026, 11, 2), Priority::Medium, work.id()),
        pending_task("Baixa", date(2026, 11, 2), Priority::Low, work.id()),
    ];
    for task in &tasks {
        context
            .repository
            .store(task)
            .await
            .expect("task store should succeed");
    }
    Seeded { work, leisure }
}

fn pending() -> TaskQuery {
    TaskQuery::new(TaskStatus::Pending)
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title().as_str()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_is_case_insensitive_across_fields(#[future] pg_context: PgTestContext) {
    let context = pg_context.await;
    seed(&context).await;

    for (term, expected) in [
        ("EMAIL", vec!["Enviar email urgente"]),
        ("lazer", vec!["Planejar ferias"]),
        ("100%", vec![]),
        ("%", vec![]),
        ("_", vec![]),
        ("Med_a", vec![]),
    ] {
        let found = context
            .repository
            .list(&pending().with_search(term))
            .await
            .expect("list should succeed");
        assert_eq!(titles(&found), expected, "term {term}");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn category_filter_is_exact(#[future] pg_context: PgTestContext) {
    let context = pg_context.await;
    let seeded = seed(&context).await;

    let found = context
        .repository
        .list(&pending().with_category(seeded.leisure.id()))
        .await
        .expect("list should succeed");
    assert_eq!(titles(&found), vec!["Planejar ferias"]);

    let work_tasks = context
        .repository
        .list(&pending().with_category(seeded.work.id()))
        .await
        .expect("list should succeed");
    assert_eq!(work_tasks.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn orderings_match_in_memory_semantics(#[future] pg_context: PgTestContext) {
    let context = pg_context.await;
    seed(&context).await;

    let by_date = context
        .repository
        .list(&pending().with_sort(TaskSort::DueDate))
        .await
        .expect("list should succeed");
    let by_priority = context
        .repository
        .list(&pending().with_sort(TaskSort::Priority))
        .await
        .expect("list should succeed");

    assert_eq!(
        titles(&by_date),
        vec!["Enviar email urgente", "Planejar ferias", "Baixa", "Media"]
    );
    assert_eq!(
        titles(&by_priority),
        vec!["Enviar email urgente", "Media", "Planejar ferias", "Baixa"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_between_limits_range(#[future] pg_context: PgTestContext) {
    let context = pg_context.await;
    seed(&context).await;

    let october = context
        .repository
        .list_due_between(TaskStatus::Pending, date(2026, 9, 27), date(2026, 10, 31))
        .await
        .expect("lookup should succeed");
    assert_eq!(
        titles(&october),
        vec!["Enviar email urgente", "Planejar ferias"]
    );
}
