// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::helpers::*;
use anyhow::Result;
use std::time::Instant;

/// One CI step: a title, a colour and the cargo arguments it runs.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    color: &'static str,
    args: &'static [&'static str],
}

pub const BUILD: Step = Step {
    name: "Build",
    color: BLUE,
    args: &["build", "--workspace", "--exclude", "xtask"],
};

pub const TEST: Step = Step {
    name: "Tests",
    color: GREEN,
    args: &["test", "--workspace"],
};

pub const CHECK: Step = Step {
    name: "Check",
    color: CYAN,
    args: &["check", "--workspace"],
};

// `fmt` takes `--all`, not `--workspace`.
pub const FORMAT: Step = Step {
    name: "Format",
    color: YELLOW,
    args: &["fmt", "--all", "--", "--check"],
};

pub const CLIPPY: Step = Step {
    name: "Clippy",
    color: YELLOW,
    args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
};

pub const SANDBOX: Step = Step {
    name: "Sandbox",
    color: BLUE,
    args: &["run", "-p", "sandbox"],
};

pub const PIPELINE: [Step; 5] = [BUILD, TEST, CHECK, FORMAT, CLIPPY];

pub fn run(step: Step) -> Result<()> {
    print_task_start(step.name, step.color);
    cargo(step.args, step.name)
}

/// Runs every pipeline step, even after a failure, then reports.
pub fn all() -> Result<()> {
    println!("{BANNER}");
    let start_time = Instant::now();

    let failed: Vec<&str> = PIPELINE
        .iter()
        .enumerate()
        .filter_map(|(i, step)| {
            println!("\n{BOLD}[{}/{}]{RESET}", i + 1, PIPELINE.len());
            run(*step).err().map(|_| step.name)
        })
        .collect();

    let seconds = start_time.elapsed().as_secs_f64();
    if failed.is_empty() {
        print_success(&format!(
            "All {} steps passed in {seconds:.2}s",
            PIPELINE.len()
        ));
        Ok(())
    } else {
        print_error(&format!("Failed steps: {}", failed.join(", ")));
        anyhow::bail!(
            "pipeline failed: {}/{} steps passed",
            PIPELINE.len() - failed.len(),
            PIPELINE.len()
        );
    }
}
