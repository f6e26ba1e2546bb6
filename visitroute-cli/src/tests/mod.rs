//! Shared test harness modules for the `visitroute` CLI.

use super::*;

mod helpers;
mod optimize_steps;
