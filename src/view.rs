use crate::task::{Category, Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => task.priority == priority,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            PriorityFilter::All => PriorityFilter::Only(Priority::ALL[0]),
            PriorityFilter::Only(current) => {
                let at = Priority::ALL.iter().position(|&p| p == current).unwrap_or(0);
                match Priority::ALL.get(at + 1) {
                    Some(&next) => PriorityFilter::Only(next),
                    None => PriorityFilter::All,
                }
            }
        }
    }

    pub fn label(self) -> String {
        match self {
            PriorityFilter::All => "all".to_string(),
            PriorityFilter::Only(priority) => priority.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => task.category == category,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::ALL[0]),
            CategoryFilter::Only(current) => {
                let at = Category::ALL.iter().position(|&c| c == current).unwrap_or(0);
                match Category::ALL.get(at + 1) {
                    Some(&next) => CategoryFilter::Only(next),
                    None => CategoryFilter::All,
                }
            }
        }
    }

    pub fn label(self) -> String {
        match self {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(category) => category.to_string(),
        }
    }
}

/// Result of filtering and ordering the collection for display. The two
/// empty variants stay distinct so the caller can word its placeholder.
#[derive(Debug, PartialEq)]
pub enum Projection<'a> {
    /// The collection itself is empty.
    NoTasks,
    /// Tasks exist, but none passed the filters.
    NoMatches,
    Tasks(Vec<&'a Task>),
}

impl<'a> Projection<'a> {
    pub fn tasks(&self) -> &[&'a Task] {
        match self {
            Projection::Tasks(tasks) => tasks,
            _ => &[],
        }
    }
}

/// Pure filter-then-sort over the collection. The three filters AND
/// together; the sort is stable ascending on (incomplete first, priority
/// rank, deadline).
pub fn project<'a>(
    tasks: &'a [Task],
    status: StatusFilter,
    priority: PriorityFilter,
    category: CategoryFilter,
) -> Projection<'a> {
    if tasks.is_empty() {
        return Projection::NoTasks;
    }
    let mut picked: Vec<&Task> = tasks
        .iter()
        .filter(|t| status.matches(t) && priority.matches(t) && category.matches(t))
        .collect();
    if picked.is_empty() {
        return Projection::NoMatches;
    }
    picked.sort_by_key(|t| (t.completed, t.priority.rank(), t.deadline));
    Projection::Tasks(picked)
}

/// Counters for the header strip. `high_priority` counts open tasks only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub high_priority: usize,
}

impl Stats {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
            high_priority: tasks
                .iter()
                .filter(|t| t.priority == Priority::High && !t.completed)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn task(
        id: u32,
        completed: bool,
        priority: Priority,
        category: Category,
        deadline: &str,
    ) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            category,
            description: String::new(),
            deadline: deadline.parse::<NaiveDate>().unwrap(),
            priority,
            completed,
            created_at: Utc::now(),
        }
    }

    fn fixture() -> Vec<Task> {
        vec![
            // A: open, high, earliest deadline
            task(1, false, Priority::High, Category::Work, "2024-01-01"),
            // B: completed, low
            task(2, true, Priority::Low, Category::Personal, "2024-01-02"),
            // C: open, medium, same deadline as A
            task(3, false, Priority::Medium, Category::Work, "2024-01-01"),
        ]
    }

    fn ids(projection: &Projection<'_>) -> Vec<u32> {
        projection.tasks().iter().map(|t| t.id).collect()
    }

    #[test]
    fn active_filter_keeps_open_tasks_in_priority_order() {
        let tasks = fixture();
        let projection = project(
            &tasks,
            StatusFilter::Active,
            PriorityFilter::All,
            CategoryFilter::All,
        );
        assert_eq!(ids(&projection), vec![1, 3]);
    }

    #[test]
    fn completed_filter_keeps_only_completed_tasks() {
        let tasks = fixture();
        let projection = project(
            &tasks,
            StatusFilter::Completed,
            PriorityFilter::All,
            CategoryFilter::All,
        );
        assert_eq!(ids(&projection), vec![2]);
    }

    #[test]
    fn priority_filter_is_an_exact_match() {
        let tasks = fixture();
        let projection = project(
            &tasks,
            StatusFilter::All,
            PriorityFilter::Only(Priority::High),
            CategoryFilter::All,
        );
        assert_eq!(ids(&projection), vec![1]);
    }

    #[test]
    fn filters_compose_with_and() {
        let tasks = fixture();
        let projection = project(
            &tasks,
            StatusFilter::Active,
            PriorityFilter::Only(Priority::Low),
            CategoryFilter::Only(Category::Personal),
        );
        assert_eq!(projection, Projection::NoMatches);
    }

    #[test]
    fn completed_tasks_sort_after_open_ones_then_deadline_breaks_ties() {
        let tasks = vec![
            task(1, true, Priority::High, Category::Work, "2024-01-01"),
            task(2, false, Priority::Low, Category::Work, "2024-02-01"),
            task(3, false, Priority::Low, Category::Work, "2024-01-15"),
        ];
        let projection = project(
            &tasks,
            StatusFilter::All,
            PriorityFilter::All,
            CategoryFilter::All,
        );
        assert_eq!(ids(&projection), vec![3, 2, 1]);
    }

    #[test]
    fn empty_collection_and_filtered_out_collection_are_distinct() {
        assert_eq!(
            project(&[], StatusFilter::All, PriorityFilter::All, CategoryFilter::All),
            Projection::NoTasks
        );

        let tasks = fixture();
        let projection = project(
            &tasks,
            StatusFilter::All,
            PriorityFilter::All,
            CategoryFilter::Only(Category::Health),
        );
        assert_eq!(projection, Projection::NoMatches);
    }

    #[test]
    fn filter_cycles_visit_every_choice_and_wrap() {
        let mut filter = PriorityFilter::All;
        let mut seen = vec![filter];
        loop {
            filter = filter.cycle();
            if filter == PriorityFilter::All {
                break;
            }
            seen.push(filter);
        }
        assert_eq!(seen.len(), 1 + Priority::ALL.len());

        assert_eq!(StatusFilter::Completed.cycle(), StatusFilter::All);
        assert_eq!(
            CategoryFilter::Only(Category::Others).cycle(),
            CategoryFilter::All
        );
    }

    #[test]
    fn stats_count_totals_and_open_high_priority() {
        let tasks = vec![
            task(1, false, Priority::High, Category::Work, "2024-01-01"),
            task(2, true, Priority::High, Category::Work, "2024-01-01"),
            task(3, false, Priority::Low, Category::Personal, "2024-01-01"),
        ];
        let stats = Stats::of(&tasks);
        assert_eq!(
            stats,
            Stats {
                total: 3,
                active: 2,
                completed: 1,
                high_priority: 1,
            }
        );
    }
}
