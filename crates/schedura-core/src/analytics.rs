//! Derived summaries over a date range.
//!
//! Tasks and goals are attributed to the day they were created, events to
//! the day they start and habits to their check-in days. Nothing here is
//! stored; every figure is recomputed from the document.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::filter::events_in;
use crate::model::{Document, EntityId};
use crate::range::{within, DateBounds};
use crate::suggest::Quadrant;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// Percent completed, rounded down.
    pub completion_rate: u8,
    pub overdue: usize,
    /// Open tasks per quadrant.
    pub open_by_quadrant: BTreeMap<Quadrant, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalStats {
    pub total: usize,
    pub completed: usize,
    pub average_progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HabitStats {
    pub total: usize,
    pub check_ins: usize,
    pub average_current_streak: f64,
    pub longest_current_streak: u32,
    pub best_streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventStats {
    pub total: usize,
    pub scheduled_minutes: i64,
    pub per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category_id: EntityId,
    pub name: String,
    pub tasks: usize,
    pub tasks_completed: usize,
    pub event_minutes: i64,
}

/// Everything the analytics view shows for one range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub bounds: Option<DateBounds>,
    pub tasks: TaskStats,
    pub goals: GoalStats,
    pub habits: HabitStats,
    pub events: EventStats,
    pub categories: Vec<CategoryBreakdown>,
    /// Weekday on which the most tasks were completed.
    pub most_productive_weekday: Option<String>,
    pub points: u32,
}

impl Summary {
    pub fn compute(doc: &Document, bounds: Option<DateBounds>, today: NaiveDate) -> Self {
        let range = bounds.as_ref();

        let tasks: Vec<_> = doc
            .tasks
            .iter()
            .filter(|t| within(range, t.created_at.date()))
            .collect();
        let mut task_stats = TaskStats {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.completed).count(),
            overdue: tasks.iter().filter(|t| t.is_overdue(today)).count(),
            ..TaskStats::default()
        };
        task_stats.completion_rate = percent(task_stats.completed, task_stats.total);
        for quadrant in Quadrant::ALL {
            task_stats.open_by_quadrant.insert(quadrant, 0);
        }
        for task in tasks.iter().filter(|t| !t.completed) {
            *task_stats.open_by_quadrant.entry(task.quadrant()).or_default() += 1;
        }

        let goals: Vec<_> = doc
            .goals
            .iter()
            .filter(|g| within(range, g.created_at.date()))
            .collect();
        let goal_stats = GoalStats {
            total: goals.len(),
            completed: goals.iter().filter(|g| g.completed).count(),
            average_progress: mean(goals.iter().map(|g| f64::from(g.progress))),
        };

        let habit_stats = HabitStats {
            total: doc.habits.len(),
            check_ins: doc
                .habits
                .iter()
                .flat_map(|h| h.check_ins.iter())
                .filter(|d| within(range, **d))
                .count(),
            average_current_streak: mean(doc.habits.iter().map(|h| f64::from(h.current_streak))),
            longest_current_streak: doc.habits.iter().map(|h| h.current_streak).max().unwrap_or(0),
            best_streak: doc.habits.iter().map(|h| h.best_streak).max().unwrap_or(0),
        };

        let events = events_in(&doc.events, range);
        let span_days = match range {
            Some(b) => b.days(),
            None => match (events.first(), events.last()) {
                (Some(first), Some(last)) => {
                    (last.start_time.date() - first.start_time.date()).num_days() + 1
                }
                _ => 1,
            },
        };
        let event_stats = EventStats {
            total: events.len(),
            scheduled_minutes: events.iter().map(|e| e.duration_minutes()).sum(),
            per_day: events.len() as f64 / span_days.max(1) as f64,
        };

        let categories = doc
            .categories
            .iter()
            .map(|c| {
                let owned = |id: &Option<EntityId>| id.as_deref() == Some(c.id.as_str());
                CategoryBreakdown {
                    category_id: c.id.clone(),
                    name: c.name.clone(),
                    tasks: tasks.iter().filter(|t| owned(&t.category_id)).count(),
                    tasks_completed: tasks
                        .iter()
                        .filter(|t| t.completed && owned(&t.category_id))
                        .count(),
                    event_minutes: events
                        .iter()
                        .filter(|e| owned(&e.category_id))
                        .map(|e| e.duration_minutes())
                        .sum(),
                }
            })
            .collect();

        Self {
            bounds,
            tasks: task_stats,
            goals: goal_stats,
            habits: habit_stats,
            events: event_stats,
            categories,
            most_productive_weekday: most_productive_weekday(doc, range),
            points: doc.points,
        }
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn most_productive_weekday(doc: &Document, range: Option<&DateBounds>) -> Option<String> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for completed_at in doc.tasks.iter().filter_map(|t| t.completed_at) {
        if within(range, completed_at.date()) {
            *counts
                .entry(completed_at.weekday().num_days_from_monday())
                .or_default() += 1;
        }
    }
    // Earliest weekday wins ties.
    let (day, _) = counts
        .into_iter()
        .fold(None, |best: Option<(u32, usize)>, (day, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((day, n)),
        })?;
    WEEK.get(day as usize).map(|w| w.to_string())
}

fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        (part * 100 / total) as u8
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Event, Goal, Habit, Task};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn sample() -> Document {
        let mut doc = Document::seeded();
        let work = doc.categories[0].id.clone();

        for (i, done) in [true, true, false].into_iter().enumerate() {
            let mut t = Task::new(format!("task {i}"));
            t.created_at = d(2).and_hms_opt(9, 0, 0).unwrap();
            t.category_id = Some(work.clone());
            t.completed = done;
            if done {
                // 2024-04-03 is a Wednesday.
                t.completed_at = Some(d(3).and_hms_opt(17, 0, 0).unwrap());
            }
            doc.tasks.push(t);
        }
        let mut old = Task::new("old");
        old.created_at = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        doc.tasks.push(old);

        let mut goal = Goal::new("goal");
        goal.created_at = d(1).and_hms_opt(8, 0, 0).unwrap();
        goal.progress = 50;
        doc.goals.push(goal);

        let mut habit = Habit::new("walk", Default::default());
        habit.check_ins = vec![d(1), d(2), d(3)];
        habit.current_streak = 3;
        habit.best_streak = 4;
        doc.habits.push(habit);

        let mut meeting = Event::new(
            "meeting",
            d(2).and_hms_opt(10, 0, 0).unwrap(),
            d(2).and_hms_opt(11, 30, 0).unwrap(),
        );
        meeting.category_id = Some(work);
        doc.events.push(meeting);
        doc.points = 20;
        doc
    }

    #[test]
    fn summary_over_bounded_range() {
        let doc = sample();
        let bounds = DateBounds::new(d(1), d(7)).unwrap();
        let summary = Summary::compute(&doc, Some(bounds), d(7));

        assert_eq!(summary.tasks.total, 3);
        assert_eq!(summary.tasks.completed, 2);
        assert_eq!(summary.tasks.completion_rate, 66);
        assert_eq!(summary.tasks.open_by_quadrant[&Quadrant::Medium], 1);
        assert_eq!(summary.goals.average_progress, 50.0);
        assert_eq!(summary.habits.check_ins, 3);
        assert_eq!(summary.habits.best_streak, 4);
        assert_eq!(summary.events.scheduled_minutes, 90);
        assert_eq!(summary.events.per_day, 1.0 / 7.0);
        assert_eq!(summary.categories[0].tasks_completed, 2);
        assert_eq!(summary.categories[0].event_minutes, 90);
        assert_eq!(summary.most_productive_weekday.as_deref(), Some("Wed"));
        assert_eq!(summary.points, 20);
    }

    #[test]
    fn all_time_includes_everything() {
        let summary = Summary::compute(&sample(), None, d(7));
        assert_eq!(summary.tasks.total, 4);
        assert_eq!(summary.events.per_day, 1.0);
    }

    #[test]
    fn empty_document_has_zero_rates() {
        let summary = Summary::compute(&Document::seeded(), None, d(1));
        assert_eq!(summary.tasks.completion_rate, 0);
        assert_eq!(summary.goals.average_progress, 0.0);
        assert_eq!(summary.most_productive_weekday, None);
        assert_eq!(summary.categories.len(), 4);
    }
}
