//! View models handed to the page templates.

use crate::task::{
    domain::{
        CalendarDay, CalendarMonth, Category, CategoryFormInput, FormErrors, MonthCalendar,
        Priority, SearchTerm, TaskFormInput, TaskId, TaskStatus,
    },
    services::{TaskListEntry, TaskListPage},
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

const ISO_DATE: &str = "%Y-%m-%d";
const DISPLAY_DATE: &str = "%d/%m/%Y";

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

const WEEKDAYS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

/// Per-request settings for the task form page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormPresentation {
    /// Page heading.
    pub heading: &'static str,
    /// URL the form posts to.
    pub action: String,
    /// Submit button label.
    pub submit_label: &'static str,
    /// Earliest selectable due date, as a browser hint.
    pub min_due_date: Option<String>,
}

impl FormPresentation {
    /// Presentation for the create form; due dates before `today` are hinted
    /// as unavailable.
    #[must_use]
    pub fn for_create(today: NaiveDate) -> Self {
        Self {
            heading: "Adicionar tarefa",
            action: "/adicionar_tarefa/".to_owned(),
            submit_label: "Adicionar",
            min_due_date: Some(today.format(ISO_DATE).to_string()),
        }
    }

    /// Presentation for the edit form of task `id`.
    #[must_use]
    pub fn for_edit(id: TaskId) -> Self {
        Self {
            heading: "Editar tarefa",
            action: format!("/{id}/editar"),
            submit_label: "Salvar",
            min_due_date: None,
        }
    }
}

/// Category entry for drop-downs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    id: String,
    name: String,
    selected: bool,
}

impl CategoryOption {
    fn list(categories: &[Category], selected: Option<&str>) -> Vec<Self> {
        categories
            .iter()
            .map(|category| {
                let id = category.id().to_string();
                Self {
                    selected: selected.is_some_and(|value| value.trim() == id),
                    name: category.name().as_str().to_owned(),
                    id,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PriorityOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

impl PriorityOption {
    fn list(selected: &str) -> Vec<Self> {
        Priority::ALL
            .iter()
            .map(|priority| Self {
                value: priority.as_str(),
                label: priority_label(*priority),
                selected: priority.as_str() == selected.trim(),
            })
            .collect()
    }
}

const fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "Alta",
        Priority::Medium => "Média",
        Priority::Low => "Baixa",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct TaskRow {
    id: String,
    title: String,
    description: String,
    due_date: String,
    priority: &'static str,
    priority_label: &'static str,
    category: String,
    overdue: bool,
}

impl From<&TaskListEntry> for TaskRow {
    fn from(entry: &TaskListEntry) -> Self {
        let task = &entry.task;
        Self {
            id: task.id().to_string(),
            title: task.title().as_str().to_owned(),
            description: task.description().as_str().to_owned(),
            due_date: task.due_date().format(DISPLAY_DATE).to_string(),
            priority: task.priority().as_str(),
            priority_label: priority_label(task.priority()),
            category: entry.category_name.clone(),
            overdue: entry.overdue,
        }
    }
}

/// Context for a status partition list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    heading: &'static str,
    status: &'static str,
    path: &'static str,
    tasks: Vec<TaskRow>,
    categories: Vec<CategoryOption>,
    selected_category: Option<String>,
    search: String,
    sort: &'static str,
    today: String,
}

impl From<&TaskListPage> for ListView {
    fn from(page: &TaskListPage) -> Self {
        let status = page.query.status();
        let (heading, path) = partition(status);
        let selected_category = page.query.category().map(|id| id.to_string());
        Self {
            heading,
            status: status.as_str(),
            path,
            tasks: page.entries.iter().map(TaskRow::from).collect(),
            categories: CategoryOption::list(&page.categories, selected_category.as_deref()),
            selected_category,
            search: page
                .query
                .search()
                .map(SearchTerm::as_str)
                .unwrap_or_default()
                .to_owned(),
            sort: page.query.sort().as_param(),
            today: page.today.format(DISPLAY_DATE).to_string(),
        }
    }
}

/// Returns the heading and path of a status partition.
#[must_use]
pub const fn partition(status: TaskStatus) -> (&'static str, &'static str) {
    match status {
        TaskStatus::Pending => ("Tarefas pendentes", "/"),
        TaskStatus::Completed => ("Tarefas concluídas", "/concluidas/"),
        TaskStatus::Postponed => ("Tarefas adiadas", "/adiadas/"),
    }
}

/// Context for the task create and edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFormView<'a> {
    presentation: &'a FormPresentation,
    form: &'a TaskFormInput,
    errors: BTreeMap<&'static str, Vec<String>>,
    categories: Vec<CategoryOption>,
    priorities: Vec<PriorityOption>,
}

impl<'a> TaskFormView<'a> {
    /// Builds the form context with the submitted or initial values.
    #[must_use]
    pub fn new(
        presentation: &'a FormPresentation,
        form: &'a TaskFormInput,
        errors: &FormErrors,
        categories: &[Category],
    ) -> Self {
        Self {
            presentation,
            form,
            errors: errors.messages(),
            categories: CategoryOption::list(categories, Some(form.category.as_str())),
            priorities: PriorityOption::list(&form.priority),
        }
    }
}

/// Context for the category form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFormView<'a> {
    form: &'a CategoryFormInput,
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl<'a> CategoryFormView<'a> {
    /// Builds the form context with the submitted values.
    #[must_use]
    pub fn new(form: &'a CategoryFormInput, errors: &FormErrors) -> Self {
        Self {
            form,
            errors: errors.messages(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct MonthLink {
    year: i32,
    month: u32,
    label: String,
}

impl From<CalendarMonth> for MonthLink {
    fn from(month: CalendarMonth) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
            label: month_label(month),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CalendarTask {
    id: String,
    title: String,
    priority: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CalendarCell {
    day: u32,
    date: String,
    in_month: bool,
    is_today: bool,
    tasks: Vec<CalendarTask>,
}

impl From<&CalendarDay> for CalendarCell {
    fn from(day: &CalendarDay) -> Self {
        Self {
            day: day.date().day(),
            date: day.date().format(ISO_DATE).to_string(),
            in_month: day.in_month(),
            is_today: day.is_today(),
            tasks: day
                .tasks()
                .iter()
                .map(|task| CalendarTask {
                    id: task.id().to_string(),
                    title: task.title().as_str().to_owned(),
                    priority: task.priority().as_str(),
                })
                .collect(),
        }
    }
}

/// Context for the monthly calendar page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    title: String,
    weekdays: [&'static str; 7],
    weeks: Vec<Vec<CalendarCell>>,
    previous: Option<MonthLink>,
    next: Option<MonthLink>,
}

impl From<&MonthCalendar> for CalendarView {
    fn from(calendar: &MonthCalendar) -> Self {
        Self {
            title: month_label(calendar.month()),
            weekdays: WEEKDAYS,
            weeks: calendar
                .weeks()
                .iter()
                .map(|week| week.days().iter().map(CalendarCell::from).collect())
                .collect(),
            previous: calendar.previous().map(MonthLink::from),
            next: calendar.next().map(MonthLink::from),
        }
    }
}

fn month_label(month: CalendarMonth) -> String {
    let name = month
        .month()
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| MONTH_NAMES.get(index))
        .copied()
        .unwrap_or_default();
    format!("{name} de {}", month.year())
}
