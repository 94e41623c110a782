//! The gate-algebra collaborator: target/control qubits, commutation,
//! special-gate detection, and the SWAP factory the Queue Transformer uses
//! to insert reconfigurations. Control qubits are tracked separately from
//! target qubits so the Wave Builder can turn a global control into a
//! per-device activation mask instead of a swap.

use crate::matrices::{
    self, HADAMARD, IDENTITY, PAULI_X, PAULI_Y, PAULI_Z, SDG_GATE, SWAP_MATRIX, S_GATE, TDG_GATE,
    T_GATE,
};
use crate::maths::Matrix;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A read-only observer invoked on the merged full state vector; never
/// mutates it. The "Callback" special gate.
pub type CallbackFn = Arc<dyn Fn(&[crate::maths::Complex]) + Send + Sync>;

/// A full-state-to-full-state transform (e.g. a reset/"Flatten"); the
/// "full-state gate" special gate.
pub type FullStateFn = Arc<dyn Fn(Vec<crate::maths::Complex>) -> Vec<crate::maths::Complex> + Send + Sync>;

#[derive(Clone)]
pub enum GateKind {
    /// A unitary with a matrix defined on `targets` alone; `controls`
    /// (tracked on the owning `Gate`) gate whether it is applied.
    Unitary(Matrix),
    /// Exchanges the amplitudes of exactly two qubits. Never controlled.
    Swap,
    Callback(CallbackFn),
    FullState(FullStateFn),
}

impl fmt::Debug for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::Unitary(m) => write!(f, "Unitary({}x{})", m.rows, m.cols),
            GateKind::Swap => write!(f, "Swap"),
            GateKind::Callback(_) => write!(f, "Callback"),
            GateKind::FullState(_) => write!(f, "FullState"),
        }
    }
}

/// A gate in the user's circuit queue.
///
/// `targets` is the ordered tuple of qubits the gate's matrix acts on;
/// `controls` is the (unordered) set of qubits that gate the application.
/// A gate with no targets and that is not a `Swap` is "special" — a
/// callback or full-state reset.
#[derive(Clone, Debug)]
pub struct Gate {
    pub name: String,
    pub kind: GateKind,
    targets: Vec<usize>,
    controls: Vec<usize>,
    /// Snapshot of the active swap list at the moment a special gate was
    /// accepted by the Queue Transformer. `None` until the transform pass
    /// tags it.
    pub swap_reset: Option<Vec<(usize, usize)>>,
}

impl Gate {
    fn new(name: impl Into<String>, kind: GateKind, targets: Vec<usize>, controls: Vec<usize>) -> Self {
        Gate {
            name: name.into(),
            kind,
            targets,
            controls,
            swap_reset: None,
        }
    }

    pub fn target_qubits(&self) -> &[usize] {
        &self.targets
    }

    pub fn control_qubits(&self) -> &[usize] {
        &self.controls
    }

    pub fn is_swap(&self) -> bool {
        matches!(self.kind, GateKind::Swap)
    }

    /// No targets and not a SWAP: a callback or full-state op.
    pub fn is_special(&self) -> bool {
        self.targets.is_empty() && !self.is_swap()
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        match &self.kind {
            GateKind::Unitary(m) => Some(m),
            GateKind::Swap => Some(&SWAP_MATRIX),
            _ => None,
        }
    }

    /// Two gates commute if they touch disjoint qubits, or if both are
    /// diagonal unitaries acting on the identical target set.
    pub fn commutes(&self, other: &Gate) -> bool {
        let mine: std::collections::HashSet<usize> = self
            .targets
            .iter()
            .chain(self.controls.iter())
            .copied()
            .collect();
        let theirs: std::collections::HashSet<usize> = other
            .targets
            .iter()
            .chain(other.controls.iter())
            .copied()
            .collect();
        if mine.is_disjoint(&theirs) {
            return true;
        }
        if let (GateKind::Unitary(m1), GateKind::Unitary(m2)) = (&self.kind, &other.kind) {
            if self.targets == other.targets && is_diagonal(m1) && is_diagonal(m2) {
                return true;
            }
        }
        false
    }

    /// Factory for a global/local SWAP, used by the Queue Transformer when
    /// inserting a reconfiguration and by the undo tail.
    pub fn make_swap(a: usize, b: usize) -> Gate {
        Gate::new("SWAP", GateKind::Swap, vec![a, b], vec![])
    }

    pub fn callback(name: impl Into<String>, f: CallbackFn) -> Gate {
        Gate::new(name, GateKind::Callback(f), vec![], vec![])
    }

    pub fn full_state_op(name: impl Into<String>, f: FullStateFn) -> Gate {
        Gate::new(name, GateKind::FullState(f), vec![], vec![])
    }

    /// Rewrites every target/control id through `map`, leaving ids absent
    /// from `map` untouched. Used after a swap substitution is chosen, to
    /// patch every deferred gate still waiting to be accepted.
    pub fn remap_qubits(&mut self, map: &HashMap<usize, usize>) {
        for q in self.targets.iter_mut() {
            if let Some(&mapped) = map.get(q) {
                *q = mapped;
            }
        }
        for q in self.controls.iter_mut() {
            if let Some(&mapped) = map.get(q) {
                *q = mapped;
            }
        }
    }

    // -- Builder-style constructors for the standard gate set. --

    pub fn h(target: usize) -> Gate {
        Gate::new("H", GateKind::Unitary(HADAMARD.clone()), vec![target], vec![])
    }
    pub fn x(target: usize) -> Gate {
        Gate::new("X", GateKind::Unitary(PAULI_X.clone()), vec![target], vec![])
    }
    pub fn y(target: usize) -> Gate {
        Gate::new("Y", GateKind::Unitary(PAULI_Y.clone()), vec![target], vec![])
    }
    pub fn z(target: usize) -> Gate {
        Gate::new("Z", GateKind::Unitary(PAULI_Z.clone()), vec![target], vec![])
    }
    pub fn s(target: usize) -> Gate {
        Gate::new("S", GateKind::Unitary(S_GATE.clone()), vec![target], vec![])
    }
    pub fn sdg(target: usize) -> Gate {
        Gate::new("Sdg", GateKind::Unitary(SDG_GATE.clone()), vec![target], vec![])
    }
    pub fn t(target: usize) -> Gate {
        Gate::new("T", GateKind::Unitary(T_GATE.clone()), vec![target], vec![])
    }
    pub fn tdg(target: usize) -> Gate {
        Gate::new("Tdg", GateKind::Unitary(TDG_GATE.clone()), vec![target], vec![])
    }
    pub fn identity(target: usize) -> Gate {
        Gate::new("I", GateKind::Unitary(IDENTITY.clone()), vec![target], vec![])
    }
    pub fn rx(target: usize, theta: f64) -> Gate {
        Gate::new("Rx", GateKind::Unitary(matrices::rx_matrix(theta)), vec![target], vec![])
    }
    pub fn ry(target: usize, theta: f64) -> Gate {
        Gate::new("Ry", GateKind::Unitary(matrices::ry_matrix(theta)), vec![target], vec![])
    }
    pub fn rz(target: usize, theta: f64) -> Gate {
        Gate::new("Rz", GateKind::Unitary(matrices::rz_matrix(theta)), vec![target], vec![])
    }
    pub fn p(target: usize, theta: f64) -> Gate {
        Gate::new("P", GateKind::Unitary(matrices::p_matrix(theta)), vec![target], vec![])
    }

    pub fn cnot(control: usize, target: usize) -> Gate {
        Gate::new("CNOT", GateKind::Unitary(PAULI_X.clone()), vec![target], vec![control])
    }
    pub fn cz(control: usize, target: usize) -> Gate {
        Gate::new("CZ", GateKind::Unitary(PAULI_Z.clone()), vec![target], vec![control])
    }
    pub fn crx(control: usize, target: usize, theta: f64) -> Gate {
        Gate::new("CRx", GateKind::Unitary(matrices::rx_matrix(theta)), vec![target], vec![control])
    }
    pub fn cry(control: usize, target: usize, theta: f64) -> Gate {
        Gate::new("CRy", GateKind::Unitary(matrices::ry_matrix(theta)), vec![target], vec![control])
    }
    pub fn crz(control: usize, target: usize, theta: f64) -> Gate {
        Gate::new("CRz", GateKind::Unitary(matrices::rz_matrix(theta)), vec![target], vec![control])
    }
    pub fn cp(control: usize, target: usize, theta: f64) -> Gate {
        Gate::new("CP", GateKind::Unitary(matrices::p_matrix(theta)), vec![target], vec![control])
    }
    pub fn ccnot(control1: usize, control2: usize, target: usize) -> Gate {
        Gate::new("CCNOT", GateKind::Unitary(PAULI_X.clone()), vec![target], vec![control1, control2])
    }
    pub fn swap(a: usize, b: usize) -> Gate {
        Gate::new("SWAP", GateKind::Swap, vec![a, b], vec![])
    }
    pub fn cswap(control: usize, a: usize, b: usize) -> Gate {
        Gate::new("CSWAP", GateKind::Unitary(SWAP_MATRIX.clone()), vec![a, b], vec![control])
    }
}

fn is_diagonal(m: &Matrix) -> bool {
    if m.rows != m.cols {
        return false;
    }
    for r in 0..m.rows {
        for c in 0..m.cols {
            if r != c && !m.get(r, c).is_negligible() {
                return false;
            }
        }
    }
    true
}
