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

// Build automation for the Vesper workspace
// Run with: cargo run -p xtask -- <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::ci;

#[derive(Parser)]
#[command(author, version, about = "Vesper build automation")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build every crate in the workspace.
    Build,
    /// Run unit, integration and doc tests.
    Test,
    /// Run `cargo check` on every crate.
    Check,
    /// Verify formatting.
    Format,
    /// Run clippy with warnings as errors.
    Clippy,
    /// Run the headless sandbox.
    Sandbox,
    /// Run build, test, check, format and clippy in order.
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Task::Build => ci::run(ci::BUILD),
        Task::Test => ci::run(ci::TEST),
        Task::Check => ci::run(ci::CHECK),
        Task::Format => ci::run(ci::FORMAT),
        Task::Clippy => ci::run(ci::CLIPPY),
        Task::Sandbox => ci::run(ci::SANDBOX),
        Task::All => ci::all(),
    }
}
