//! Input validation for line balancing instances.
//!
//! Checks structural and numeric integrity of the task set before
//! any derived metric is computed. Detects:
//! - Duplicate task IDs
//! - Predecessor references to unknown tasks
//! - Circular precedence dependencies (DAG validation)
//! - Out-of-range task parameters (`m`, `s`, `out_line_cost`)
//! - Out-of-range line parameters (`q`, `c`)
//!
//! All issues are collected; nothing short-circuits, so a single pass
//! reports every offending task.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::models::Task;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending task IDs (empty for line-level parameters).
    pub task_ids: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// A task references a predecessor that doesn't exist.
    InvalidPredecessor,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// A numeric parameter is out of range or not finite.
    InvalidParameter,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, task_ids: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            task_ids,
            message: message.into(),
        }
    }
}

/// Validates the line parameters and task set of an instance.
///
/// Checks:
/// 1. `q` is finite and positive, `c` is finite and non-negative
/// 2. No duplicate task IDs
/// 3. `m > 0`, `s >= 0`, `out_line_cost >= 0`, all finite
/// 4. All predecessor references point to existing tasks
/// 5. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(tasks: &[Task], q: f64, c: f64) -> ValidationResult {
    let mut errors = Vec::new();

    if !(q.is_finite() && q > 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            Vec::new(),
            format!("Production rate q must be positive and finite, got {q}"),
        ));
    }
    if !(c.is_finite() && c >= 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            Vec::new(),
            format!("Station cost c must be non-negative and finite, got {c}"),
        ));
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                vec![task.id.clone()],
                format!("Duplicate task ID: {}", task.id),
            ));
        }
        check_task_parameters(task, &mut errors);
    }

    for task in tasks {
        for pred in &task.predecessors {
            if !task_ids.contains(pred.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    vec![task.id.clone()],
                    format!("Task '{}' references unknown predecessor '{}'", task.id, pred),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(tasks) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_task_parameters(task: &Task, errors: &mut Vec<ValidationError>) {
    let mut invalid = |field: &str, value: f64, rule: &str| {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            vec![task.id.clone()],
            format!("Task '{}' has {field} = {value}, expected {rule}", task.id),
        ));
    };

    if !(task.mean.is_finite() && task.mean > 0.0) {
        invalid("m", task.mean, "a finite value > 0");
    }
    if !(task.variance.is_finite() && task.variance >= 0.0) {
        invalid("s", task.variance, "a finite value >= 0");
    }
    if !(task.out_line_cost.is_finite() && task.out_line_cost >= 0.0) {
        invalid("out_line_cost", task.out_line_cost, "a finite value >= 0");
    }
}

/// Detects cycles in the precedence graph.
///
/// # Algorithm
/// Iterative three-colour DFS over successor edges. Meeting a node that
/// is still on the stack is a back-edge; the stack slice from that node
/// onwards is the cycle, which is reported by task ID.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(tasks: &[Task]) -> Option<ValidationError> {
    // Adjacency list: task_id → successors
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for task in tasks {
        for pred in &task.predecessors {
            adj.entry(pred.as_str()).or_default().push(task.id.as_str());
        }
    }

    let mut roots: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    roots.sort_unstable();
    roots.dedup();

    let mut done: HashSet<&str> = HashSet::new();
    let empty: Vec<&str> = Vec::new();

    for root in roots {
        if done.contains(root) {
            continue;
        }
        // (node, next successor index)
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        let mut on_stack: HashSet<&str> = HashSet::from([root]);

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            top.1 += 1;
            let successors = adj.get(node).unwrap_or(&empty);
            if let Some(&succ) = successors.get(next) {
                if on_stack.contains(succ) {
                    let start = stack.iter().position(|(n, _)| *n == succ).unwrap_or(0);
                    let cycle: Vec<String> =
                        stack[start..].iter().map(|(n, _)| n.to_string()).collect();
                    return Some(ValidationError::new(
                        ValidationErrorKind::CyclicDependency,
                        cycle.clone(),
                        format!("Circular dependency detected: {}", cycle.join(" -> ")),
                    ));
                }
                if !done.contains(succ) {
                    on_stack.insert(succ);
                    stack.push((succ, 0));
                }
            } else {
                on_stack.remove(node);
                done.insert(node);
                stack.pop();
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<Task> {
        vec![
            Task::new("A", 1.0, 0.1, 5.0),
            Task::new("B", 1.0, 0.1, 5.0).with_predecessor("A"),
            Task::new("C", 1.0, 0.1, 5.0).with_predecessor("B"),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_instance(&chain(), 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_empty_task_set_is_valid() {
        assert!(validate_instance(&[], 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_duplicate_task_id() {
        let tasks = vec![Task::new("A", 1.0, 0.1, 5.0), Task::new("A", 2.0, 0.1, 5.0)];

        let errors = validate_instance(&tasks, 1.0, 1.0).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.task_ids == ["A"]));
    }

    #[test]
    fn test_invalid_predecessor() {
        let tasks = vec![Task::new("A", 1.0, 0.1, 5.0).with_predecessor("GHOST")];

        let errors = validate_instance(&tasks, 1.0, 1.0).unwrap_err();
        let err = errors
            .iter()
            .find(|e| e.kind == ValidationErrorKind::InvalidPredecessor)
            .unwrap();
        assert_eq!(err.task_ids, vec!["A".to_string()]);
        assert!(err.message.contains("GHOST"));
    }

    #[test]
    fn test_cyclic_dependency() {
        // A → B → C → A
        let tasks = vec![
            Task::new("A", 1.0, 0.1, 5.0).with_predecessor("C"),
            Task::new("B", 1.0, 0.1, 5.0).with_predecessor("A"),
            Task::new("C", 1.0, 0.1, 5.0).with_predecessor("B"),
        ];

        let errors = validate_instance(&tasks, 1.0, 1.0).unwrap_err();
        let err = errors
            .iter()
            .find(|e| e.kind == ValidationErrorKind::CyclicDependency)
            .unwrap();
        let mut ids = err.task_ids.clone();
        ids.sort();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_self_loop() {
        let tasks = vec![Task::new("A", 1.0, 0.1, 5.0).with_predecessor("A")];

        let errors = validate_instance(&tasks, 1.0, 1.0).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicDependency && e.task_ids == ["A"]));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let tasks = vec![
            Task::new("A", 1.0, 0.1, 5.0),
            Task::new("B", 1.0, 0.1, 5.0).with_predecessor("A"),
            Task::new("C", 1.0, 0.1, 5.0).with_predecessor("A"),
            Task::new("D", 1.0, 0.1, 5.0)
                .with_predecessor("B")
                .with_predecessor("C"),
        ];
        assert!(validate_instance(&tasks, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_invalid_task_parameters() {
        let tasks = vec![
            Task::new("zero_mean", 0.0, 0.1, 5.0),
            Task::new("neg_var", 1.0, -0.1, 5.0),
            Task::new("nan_cost", 1.0, 0.1, f64::NAN),
        ];

        let errors = validate_instance(&tasks, 1.0, 1.0).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidParameter));
        let ids: Vec<&str> = errors.iter().map(|e| e.task_ids[0].as_str()).collect();
        assert_eq!(ids, vec!["zero_mean", "neg_var", "nan_cost"]);
    }

    #[test]
    fn test_invalid_line_parameters() {
        let errors = validate_instance(&chain(), 0.0, -1.0).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.task_ids.is_empty()));
    }

    #[test]
    fn test_multiple_errors() {
        let tasks = vec![
            Task::new("A", -1.0, 0.1, 5.0),
            Task::new("B", 1.0, 0.1, 5.0).with_predecessor("MISSING"),
        ];

        let errors = validate_instance(&tasks, 1.0, 1.0).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
