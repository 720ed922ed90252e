//! Some utility functions

use crate::task::Task;

/// A debug utility that pretty-prints a task list
pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("    (no tasks)");
        return;
    }
    for task in tasks {
        print_task(task);
    }
}

pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    println!("    {} {}\t{}\t{}", completion, task.title(), task.end_date(), task.id());
}
