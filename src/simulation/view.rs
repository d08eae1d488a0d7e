/*!
 * Observer Views
 * Text renderings of the process table, execution chart, and frame grid
 */

use crate::core::limits::FRAME_GRID_COLUMNS;
use crate::core::types::{FrameIndex, Pid, Priority, SimTime};
use crate::memory::{MemoryInfo, MemorySnapshot};
use crate::process::{ProcessInfo, ProcessState};
use serde::Serialize;
use std::fmt::Write;

/// Chart columns drawn per simulated second
const CHART_SCALE: f64 = 10.0;

/// One row of the process table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRow {
    pub pid: Pid,
    pub priority: Priority,
    /// Remaining time with two decimals
    pub time: String,
    pub state: &'static str,
}

impl From<&ProcessInfo> for ProcessRow {
    fn from(info: &ProcessInfo) -> Self {
        Self {
            pid: info.pid,
            priority: info.priority,
            time: format!("{:.2}", info.remaining),
            state: info.state.label(),
        }
    }
}

pub fn process_rows(processes: &[ProcessInfo]) -> Vec<ProcessRow> {
    processes.iter().map(ProcessRow::from).collect()
}

pub fn render_process_table(processes: &[ProcessInfo]) -> String {
    let mut out = format!("{:>4} | {:>8} | {:>6} | {}\n", "ID", "Priority", "Time", "State");
    for row in process_rows(processes) {
        let _ = writeln!(
            out,
            "{:>4} | {:>8} | {:>6} | {}",
            row.pid, row.priority, row.time, row.state
        );
    }
    out
}

/// One bar of the execution chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub pid: Pid,
    /// Remaining time, or zero once terminated
    pub length: SimTime,
    /// Drawn highlighted
    pub running: bool,
}

pub fn execution_chart(processes: &[ProcessInfo]) -> Vec<ChartBar> {
    processes
        .iter()
        .map(|info| ChartBar {
            pid: info.pid,
            length: if info.state == ProcessState::Terminated {
                0.0
            } else {
                info.remaining.max(0.0)
            },
            running: info.state == ProcessState::Running,
        })
        .collect()
}

pub fn render_execution_chart(processes: &[ProcessInfo]) -> String {
    let mut out = String::new();
    for bar in execution_chart(processes) {
        let cells = (bar.length * CHART_SCALE).round() as usize;
        let fill = if bar.running { '=' } else { '#' };
        let _ = writeln!(
            out,
            "P{:<3} {} {:.2}",
            bar.pid,
            std::iter::repeat(fill).take(cells).collect::<String>(),
            bar.length
        );
    }
    out
}

/// One cell of the frame grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameCell {
    Free,
    Used(Pid),
}

/// Frame pool laid out in rows of `FRAME_GRID_COLUMNS`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameGrid {
    pub rows: Vec<Vec<FrameCell>>,
}

impl FrameGrid {
    pub fn from_snapshot(snapshot: &MemorySnapshot) -> Self {
        let mut owners: Vec<FrameCell> = vec![FrameCell::Free; snapshot.total_frames];
        for (&pid, frames) in &snapshot.page_table {
            for &frame in frames {
                if let Some(cell) = owners.get_mut(frame) {
                    *cell = FrameCell::Used(pid);
                }
            }
        }
        Self {
            rows: owners
                .chunks(FRAME_GRID_COLUMNS)
                .map(|row| row.to_vec())
                .collect(),
        }
    }

    /// Grid for any memory source
    pub fn from_memory(memory: &impl MemoryInfo) -> Self {
        Self::from_snapshot(&memory.snapshot())
    }

    pub fn cell(&self, frame: FrameIndex) -> Option<FrameCell> {
        self.rows
            .get(frame / FRAME_GRID_COLUMNS)
            .and_then(|row| row.get(frame % FRAME_GRID_COLUMNS))
            .copied()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    FrameCell::Free => ".",
                    FrameCell::Used(_) => "#",
                })
                .collect();
            let _ = writeln!(out, "{}", line.join(" "));
        }
        out
    }
}
