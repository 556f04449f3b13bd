use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

pub type SimTime = f64;

new_key_type! {
    pub struct ProcessId;
}

/// One simulated workload unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub arrival_time: SimTime,
    pub service_time: SimTime,
    pub remaining_time: SimTime,
    pub start_time: Option<SimTime>,
    pub end_time: Option<SimTime>,
}

impl Process {
    pub fn new(arrival_time: SimTime, service_time: SimTime) -> Self {
        Self {
            arrival_time,
            service_time,
            remaining_time: service_time,
            start_time: None,
            end_time: None,
        }
    }

    pub fn turnaround_time(&self) -> Option<SimTime> {
        self.end_time.map(|end| end - self.arrival_time)
    }

    pub fn waiting_time(&self) -> Option<SimTime> {
        self.start_time.map(|start| start - self.arrival_time)
    }
}

pub type ProcessTable = SlotMap<ProcessId, Process>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Idle,
    Busy,
}

#[derive(Debug, Default)]
pub struct Cpu {
    pub clock: SimTime,
    pub current: Option<ProcessId>,
}

impl Cpu {
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn state(&self) -> CpuState {
        if self.is_busy() {
            CpuState::Busy
        } else {
            CpuState::Idle
        }
    }
}

/// Processes waiting for the CPU, in arrival order.
///
/// Disciplines other than FCFS are free to take from the middle through
/// [`ReadyQueue::remove`].
#[derive(Debug, Default)]
pub struct ReadyQueue {
    processes: VecDeque<ProcessId>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, process: ProcessId) {
        debug_assert!(
            !self.contains(process),
            "Process {process:?} already waiting in the ready queue"
        );
        self.processes.push_back(process);
    }

    pub fn pop_front(&mut self) -> Option<ProcessId> {
        self.processes.pop_front()
    }

    pub fn remove(&mut self, process: ProcessId) -> Option<ProcessId> {
        let index = self.processes.iter().position(|p| *p == process)?;
        self.processes.remove(index)
    }

    pub fn contains(&self, process: ProcessId) -> bool {
        self.processes.contains(&process)
    }

    pub fn iter(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.processes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn clear(&mut self) {
        self.processes.clear();
    }
}

/// Running totals for the current run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunStats {
    pub completed: u64,
    pub cumulative_turnaround_time: SimTime,
    pub cumulative_service_time: SimTime,
    // Ready-queue length sampled at each departure, before the next dispatch
    pub cumulative_ready_queue_samples: u64,
}

impl RunStats {
    pub fn record_departure(&mut self, process: &Process, now: SimTime, ready_len: usize) {
        self.completed += 1;
        self.cumulative_turnaround_time += now - process.arrival_time;
        self.cumulative_service_time += process.service_time;
        self.cumulative_ready_queue_samples += ready_len as u64;
    }
}

#[derive(Debug, Default)]
pub struct SimCtx {
    pub cpu: Cpu,
    pub ready: ReadyQueue,
    pub processes: ProcessTable,
    pub stats: RunStats,
}

impl SimCtx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> SimTime {
        self.cpu.clock
    }

    pub fn advance_to(&mut self, time: SimTime) {
        assert!(
            time >= self.cpu.clock,
            "Simulated time moved backwards: {} -> {time}",
            self.cpu.clock
        );
        self.cpu.clock = time;
    }

    pub fn create_process(&mut self, process: Process) -> ProcessId {
        self.processes.insert(process)
    }

    pub fn process(&self, id: ProcessId) -> &Process {
        self.processes
            .get(id)
            .expect("Unknown process id; it may already have departed")
    }

    pub fn process_mut(&mut self, id: ProcessId) -> &mut Process {
        self.processes
            .get_mut(id)
            .expect("Unknown process id; it may already have departed")
    }

    // Put `id` on the CPU at the current clock. Returns the completion time.
    pub fn dispatch(&mut self, id: ProcessId) -> SimTime {
        assert!(
            self.cpu.current.is_none(),
            "CPU already serving {:?}",
            self.cpu.current
        );
        debug_assert!(
            !self.ready.contains(id),
            "Dispatched process {id:?} must not be in the ready queue"
        );

        let now = self.cpu.clock;
        let process = self.process_mut(id);
        debug_assert!(
            process.start_time.is_none(),
            "Process {id:?} dispatched twice"
        );
        debug_assert!(
            process.arrival_time <= now,
            "Process {id:?} dispatched before it arrived"
        );

        let end = now + process.remaining_time;
        process.start_time = Some(now);
        process.end_time = Some(end);
        self.cpu.current = Some(id);
        end
    }

    // Take the running process off the CPU and out of the table.
    pub fn complete(&mut self, id: ProcessId) -> Process {
        assert_eq!(
            self.cpu.current,
            Some(id),
            "Departure for process {id:?} which is not the current CPU occupant"
        );
        self.cpu.current = None;

        let mut process = self
            .processes
            .remove(id)
            .expect("Running process missing from process table");
        process.remaining_time = 0.0;
        process
    }

    pub fn reset(&mut self) {
        self.cpu = Cpu::default();
        self.ready.clear();
        self.processes.clear();
        self.stats = RunStats::default();
    }
}
