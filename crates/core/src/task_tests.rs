// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn name_is_basename_of_dotted_command() {
    let task = Task::new("tasks.chaos.chaos");
    assert_eq!(task.name(), "chaos");
}

#[test]
fn name_is_whole_command_when_not_dotted() {
    let task = Task::new("deploy");
    assert_eq!(task.name(), "deploy");
}

#[test]
fn gating_defaults_true() {
    let task = Task::new("deploy");
    assert!(task.gating);
}

#[test]
fn deserializes_from_bare_string_mapping() {
    let json = serde_json::json!({ "command": "tasks.fail", "args": { "ha_only": true } });
    let task: Task = serde_json::from_value(json).unwrap();
    assert_eq!(task.name(), "fail");
    assert_eq!(task.arg_bool("ha_only"), Some(true));
}
