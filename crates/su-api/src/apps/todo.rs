use std::time::{SystemTime, UNIX_EPOCH};

use su_core::{SuValue, ValueMap};
use su_runtime::{Context, CHANGE_VALUE_KEY};
use tracing::{debug, warn};

const TASKS_KEY: &str = "tasks";
const INPUT_KEY: &str = "inputValue";

/// Handles `updateInput`, `addTask`, `markComplete` and `deleteTask`
/// against the `tasks` and `inputValue` fields of the enclosing State scope.
pub fn handle_action(action: &str, context: &Context) {
    handle_action_at(action, context, wall_clock_millis());
}

pub(crate) fn handle_action_at(action: &str, context: &Context, now_millis: u64) {
    let Some(setter) = context.state_setter() else {
        warn!(action, "todo action has no setState in context; dropping");
        return;
    };

    let tasks = context
        .get(TASKS_KEY)
        .and_then(SuValue::as_array)
        .map(<[SuValue]>::to_vec)
        .unwrap_or_default();
    let input_value = context
        .get(INPUT_KEY)
        .filter(|value| !value.is_null())
        .map(SuValue::to_text)
        .unwrap_or_default();
    let target = context
        .get("id")
        .filter(|id| id.is_truthy())
        .or_else(|| context.get("taskId"))
        .filter(|id| !id.is_null())
        .cloned();

    let (next_tasks, next_input) = match action {
        "updateInput" => {
            let value = context
                .get(CHANGE_VALUE_KEY)
                .filter(|value| value.is_truthy())
                .map(SuValue::to_text)
                .unwrap_or_default();
            (tasks, value)
        }
        "addTask" => {
            let text = input_value.trim();
            if text.is_empty() {
                debug!("addTask ignored for blank input");
                return;
            }
            let id = next_task_id(&tasks, now_millis);
            debug!(id, text, "task added");
            let mut tasks = tasks;
            tasks.push(SuValue::map([
                ("id", SuValue::from(id as f64)),
                ("text", SuValue::from(text)),
                ("completed", SuValue::from(false)),
            ]));
            (tasks, String::new())
        }
        "markComplete" => {
            let Some(target) = target else {
                debug!("markComplete without a task id");
                return;
            };
            let tasks = tasks
                .into_iter()
                .map(|task| {
                    if task_id(&task) == Some(&target) {
                        toggle_completed(task)
                    } else {
                        task
                    }
                })
                .collect();
            (tasks, input_value)
        }
        "deleteTask" => {
            let Some(target) = target else {
                debug!("deleteTask without a task id");
                return;
            };
            let tasks = tasks
                .into_iter()
                .filter(|task| task_id(task) != Some(&target))
                .collect();
            (tasks, input_value)
        }
        other => {
            warn!(action = other, "unknown todo action");
            return;
        }
    };

    let mut patch = ValueMap::new();
    patch.insert(TASKS_KEY.to_string(), SuValue::Array(next_tasks));
    patch.insert(INPUT_KEY.to_string(), SuValue::String(next_input));
    setter.set_state(patch);
}

/// A fresh id: the current time in milliseconds, bumped past every id
/// already present so rapid adds never collide.
pub fn next_task_id(tasks: &[SuValue], now_millis: u64) -> u64 {
    let highest = tasks
        .iter()
        .filter_map(|task| task_id(task)?.as_number())
        .filter(|id| id.is_finite() && *id >= 0.0)
        .map(|id| id as u64)
        .max();
    match highest {
        Some(highest) if highest >= now_millis => highest + 1,
        _ => now_millis,
    }
}

fn task_id(task: &SuValue) -> Option<&SuValue> {
    task.as_map()?.get("id")
}

fn toggle_completed(task: SuValue) -> SuValue {
    let SuValue::Map(mut fields) = task else {
        return task;
    };
    let completed = fields.get("completed").is_some_and(SuValue::is_truthy);
    fields.insert("completed".to_string(), SuValue::from(!completed));
    SuValue::Map(fields)
}

fn wall_clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
