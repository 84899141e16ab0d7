// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// Where the generated code keeps its runtime state.
///
/// Frames live in a list at `<storage> <stack>`; the callee's frame is always
/// `stack[0]`. Return values go through `<storage> <result>`, module globals
/// under `<storage> <globals>`, and all scoreboard arithmetic uses fake
/// players on `objective`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLayout {
    pub storage:    String,
    pub stack:      String,
    pub result:     String,
    pub globals:    String,
    pub scratch:    String,
    pub objective:  String,
}

impl Default for RuntimeLayout {
    fn default() -> Self {
        RuntimeLayoutBuilder::new().build()
    }
}

impl RuntimeLayout {
    /// Path of the frame `depth` levels below the current one.
    pub fn frame(&self, depth: usize) -> String {
        format!("{}[{depth}]", self.stack)
    }

    /// Variable/allocation slot in the current frame.
    pub fn slot_path(&self, slot: usize) -> String {
        format!("{}.s{slot}", self.frame(0))
    }

    /// Temporary holding an instruction result.
    pub fn temp_path(&self, index: u32) -> String {
        format!("{}.t{index}", self.frame(0))
    }

    /// Object of materialized arguments for a call.
    pub fn args_path(&self, index: u32) -> String {
        format!("{}.a{index}", self.frame(0))
    }

    /// Failure flag written after a throwing call.
    pub fn flag_key(&self, index: u32) -> String {
        format!("f{index}")
    }

    pub fn global_path(&self, name: &str) -> String {
        format!("{}.{name}", self.globals)
    }

    /// Moves a path into the caller's frame one level deeper, as seen from
    /// inside a callee that pushed its own frame.
    pub fn rebase(&self, path: &str) -> String {
        let prefix = format!("{}[", self.stack);
        let Some(rest) = path.strip_prefix(&prefix) else {
            return path.to_string();
        };
        let Some((depth, tail)) = rest.split_once(']') else {
            return path.to_string();
        };
        match depth.parse::<usize>() {
            Ok(depth) => format!("{}{tail}", self.frame(depth + 1)),
            Err(_) => path.to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeLayoutBuilder {
    storage: Option<String>,
    stack: Option<String>,
    result: Option<String>,
    globals: Option<String>,
    scratch: Option<String>,
    objective: Option<String>,
}

impl Default for RuntimeLayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeLayoutBuilder {
    pub fn new() -> Self {
        Self {
            storage: None,
            stack: None,
            result: None,
            globals: None,
            scratch: None,
            objective: None
        }
    }

    pub fn storage(mut self, storage: &str) -> Self {
        self.storage = Some(storage.to_string());
        self
    }

    pub fn stack(mut self, path: &str) -> Self {
        self.stack = Some(path.to_string());
        self
    }

    pub fn result(mut self, path: &str) -> Self {
        self.result = Some(path.to_string());
        self
    }

    pub fn globals(mut self, path: &str) -> Self {
        self.globals = Some(path.to_string());
        self
    }

    pub fn scratch(mut self, path: &str) -> Self {
        self.scratch = Some(path.to_string());
        self
    }

    pub fn objective(mut self, objective: &str) -> Self {
        self.objective = Some(objective.to_string());
        self
    }

    pub fn build(self) -> RuntimeLayout {
        RuntimeLayout {
            storage: self.storage.unwrap_or_else(|| String::from("mcc:runtime")),
            stack: self.stack.unwrap_or_else(|| String::from("stack")),
            result: self.result.unwrap_or_else(|| String::from("result")),
            globals: self.globals.unwrap_or_else(|| String::from("globals")),
            scratch: self.scratch.unwrap_or_else(|| String::from("scratch")),
            objective: self.objective.unwrap_or_else(|| String::from("mcc.regs")),
        }
    }
}
