//! Executor Frontend: circuit lifecycle — accept gates, plan (partition,
//! transform, build waves), execute waves in order, return the final state
//! or sampled measurements.

use crate::bridge;
use crate::config::AcceleratorConfig;
use crate::device::Device;
use crate::dispatch;
use crate::error::{Result, SchedulerError};
use crate::gate::Gate;
use crate::kernel::{DeviceKernel, ReferenceKernel};
use crate::maths::Complex;
use crate::measurement;
use crate::partition::Partition;
use crate::transform;
use crate::wave::{self, Wave};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// The `D` contiguous amplitude buffers the executor owns, living in the
/// memory device.
#[derive(Debug, Clone)]
pub struct Pieces {
    pub data: Vec<Vec<Complex>>,
}

impl Pieces {
    pub fn zero_state(d: usize, nlocal: usize) -> Self {
        let mut data = vec![vec![Complex::zero(); 1 << nlocal]; d];
        data[0][0] = Complex::one();
        Pieces { data }
    }

    /// Whether `partition`'s current global ordering is the ascending prefix
    /// `[0, nglobal)`, letting merge/split use a plain concatenation.
    fn is_prefix_ordering(partition: &Partition) -> bool {
        partition
            .global_list
            .iter()
            .enumerate()
            .all(|(pos, &q)| q == pos)
    }

    /// Merges `D` pieces into one full amplitude vector of length `2^n`,
    /// binding `memory_device` for the window the merged state exists in.
    /// Falls back to the general bit-transpose whenever the global ordering
    /// isn't the cheap ascending-prefix case.
    pub fn merge(&self, partition: &Partition, n: usize, memory_device: &str) -> Vec<Complex> {
        let _device = Device::new(memory_device).enter();
        if Self::is_prefix_ordering(partition) {
            return self.data.concat();
        }
        let nglobal = partition.nglobal();
        let nlocal = partition.nlocal();
        let mut full = vec![Complex::zero(); 1 << n];
        for (i, piece) in self.data.iter().enumerate() {
            for (j, &amp) in piece.iter().enumerate() {
                full[full_index(partition, n, nglobal, nlocal, i, j)] = amp;
            }
        }
        full
    }

    /// Splits a full amplitude vector back into `D` pieces; the inverse of
    /// `merge`, binding `memory_device` for the same window.
    pub fn split(full: &[Complex], partition: &Partition, n: usize, memory_device: &str) -> Self {
        let _device = Device::new(memory_device).enter();
        let d = 1 << partition.nglobal();
        let nlocal = partition.nlocal();
        if Self::is_prefix_ordering(partition) {
            let data = full.chunks(1 << nlocal).map(|c| c.to_vec()).collect();
            return Pieces { data };
        }
        let nglobal = partition.nglobal();
        let mut data = vec![vec![Complex::zero(); 1 << nlocal]; d];
        for i in 0..d {
            for j in 0..(1 << nlocal) {
                data[i][j] = full[full_index(partition, n, nglobal, nlocal, i, j)];
            }
        }
        Pieces { data }
    }
}

fn full_index(partition: &Partition, n: usize, nglobal: usize, nlocal: usize, piece: usize, offset: usize) -> usize {
    let mut idx = 0usize;
    for (pos, &q) in partition.global_list.iter().enumerate() {
        if (piece >> (nglobal - 1 - pos)) & 1 == 1 {
            idx |= 1 << (n - 1 - q);
        }
    }
    for (pos, &q) in partition.local_list.iter().enumerate() {
        if (offset >> (nlocal - 1 - pos)) & 1 == 1 {
            idx |= 1 << (n - 1 - q);
        }
    }
    idx
}

/// The precompiled execution plan. `Clone` is a full deep copy: reduced
/// gates and waves carry no shared/interior-mutable state, so a shallow
/// alias that could corrupt a concurrent run is inexpressible by accident.
#[derive(Clone)]
pub struct Plan {
    pub queue: Vec<Gate>,
    pub initial_partition: Partition,
    pub waves: Vec<Wave>,
}

/// Lifecycle owner: accept a circuit, plan it, execute it.
pub struct DistributedCircuit {
    n: usize,
    config: AcceleratorConfig,
    gates: Vec<Gate>,
    plan: Option<Plan>,
    kernel: Box<dyn DeviceKernel>,
    last_pieces: Option<Pieces>,
}

impl DistributedCircuit {
    pub fn new(n: usize, config: AcceleratorConfig) -> Result<Self> {
        config.nglobal()?;
        Ok(DistributedCircuit {
            n,
            config,
            gates: Vec::new(),
            plan: None,
            kernel: Box::new(ReferenceKernel::new()),
            last_pieces: None,
        })
    }

    pub fn with_kernel(mut self, kernel: Box<dyn DeviceKernel>) -> Self {
        self.kernel = kernel;
        self
    }

    /// Constraint on gate insertion: a gate may be added only if
    /// `n - |targets(g)| >= log2(D)`, i.e. enough qubits stay untouched to
    /// cover every global qubit.
    pub fn add(&mut self, gate: Gate) -> Result<()> {
        let nglobal = self.config.nglobal()?;
        let touched = gate.target_qubits().len();
        if touched > self.n || self.n - touched < nglobal {
            return Err(SchedulerError::InsufficientQubits {
                n: self.n,
                touched,
                needed: nglobal,
            });
        }
        self.gates.push(gate);
        self.plan = None;
        Ok(())
    }

    #[instrument(skip(self))]
    fn build_plan(&self) -> Result<Plan> {
        let nglobal = self.config.nglobal()?;
        let mut counter = vec![0usize; self.n];
        for g in &self.gates {
            for &q in g.target_qubits() {
                counter[q] += 1;
            }
        }

        let initial_partition = Partition::initial(self.n, nglobal, &counter)?;
        let global_set: HashSet<usize> = initial_partition.global_list.iter().copied().collect();

        let transformed = transform::transform(self.gates.clone(), self.n, &mut counter, &global_set)?;
        for &(a, b) in &transformed.swap_pairs {
            warn!(a, b, "inserted global/local swap");
        }

        // `initial_partition` is the plan's permanent global/local assignment:
        // the Queue Transformer already remapped every later gate's ids, so
        // no gate downstream of an inserted swap ever names an id that
        // would need a different partition to resolve.
        let waves = wave::build_waves(&transformed.queue, &initial_partition)?;

        info!(
            waves = waves.len(),
            swaps = transformed.swap_pairs.len(),
            "plan built"
        );

        Ok(Plan {
            queue: transformed.queue,
            initial_partition,
            waves,
        })
    }

    pub fn plan(&mut self) -> Result<&Plan> {
        if self.plan.is_none() {
            self.plan = Some(self.build_plan()?);
        }
        Ok(self.plan.as_ref().unwrap())
    }

    #[instrument(skip(self, initial_state))]
    pub fn execute(&mut self, initial_state: Option<Vec<Complex>>, nshots: Option<usize>) -> Result<ExecutionResult> {
        if self.gates.is_empty() {
            return Err(SchedulerError::PlanEmpty);
        }
        self.plan()?;
        let plan = self.plan.as_ref().unwrap().clone();

        let nlocal = plan.initial_partition.nlocal();
        let mut pieces = match initial_state {
            Some(full) => Pieces::split(&full, &plan.initial_partition, self.n, &self.config.memory_device),
            None => Pieces::zero_state(1 << plan.initial_partition.nglobal(), nlocal),
        };
        let device_to_pieces = self.config.device_to_pieces();

        for wave in &plan.waves {
            match wave {
                Wave::Gates(per_device) => {
                    dispatch::dispatch_wave(
                        &device_to_pieces,
                        &mut pieces.data,
                        per_device,
                        nlocal,
                        self.kernel.as_ref(),
                        self.config.memory_budget_bytes,
                    )?;
                }
                Wave::GlobalSwap { global, local } => {
                    crate::swap::do_global_swap(&mut pieces.data, &plan.initial_partition, *global, *local, nlocal);
                }
                Wave::Special(origin) => {
                    bridge::execute_special(
                        &plan.queue[*origin],
                        &mut pieces,
                        &plan.initial_partition,
                        self.kernel.as_ref(),
                        self.n,
                        nlocal,
                        &self.config.memory_device,
                    )?;
                }
            }
        }

        let final_state = pieces.merge(&plan.initial_partition, self.n, &self.config.memory_device);
        self.last_pieces = Some(pieces);

        match nshots {
            Some(shots) => Ok(ExecutionResult::Samples(measurement::sample(&final_state, shots))),
            None => Ok(ExecutionResult::State(final_state)),
        }
    }

    pub fn final_state(&self) -> Option<Vec<Complex>> {
        let plan = self.plan.as_ref()?;
        self.last_pieces
            .as_ref()
            .map(|p| p.merge(&plan.initial_partition, self.n, &self.config.memory_device))
    }
}

#[derive(Debug, Clone)]
pub enum ExecutionResult {
    State(Vec<Complex>),
    Samples(Vec<usize>),
}
