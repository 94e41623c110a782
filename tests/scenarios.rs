//! Integration tests for the six concrete scenarios and the boundary
//! behaviors laid out alongside the scheduler's testable properties.

use qdist_core::executor::{DistributedCircuit, ExecutionResult, Pieces};
use qdist_core::gate::Gate;
use qdist_core::{config::AcceleratorConfig, error::SchedulerError};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

fn config(total_devices: usize) -> AcceleratorConfig {
    let mut accelerators = BTreeMap::new();
    accelerators.insert("gpu0".to_string(), total_devices);
    AcceleratorConfig {
        accelerators,
        memory_device: "host".to_string(),
        memory_budget_bytes: None,
    }
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn scenario_1_two_hadamards_give_uniform_superposition() {
    let mut circuit = DistributedCircuit::new(2, config(2)).unwrap();
    circuit.add(Gate::h(0)).unwrap();
    circuit.add(Gate::h(1)).unwrap();
    let result = circuit.execute(None, None).unwrap();
    let state = match result {
        ExecutionResult::State(s) => s,
        _ => panic!("expected a state vector"),
    };
    assert_eq!(state.len(), 4);
    for amp in &state {
        assert_close(amp.real, 0.5);
        assert_close(amp.imaginary, 0.0);
    }
}

#[test]
fn scenario_2_cnot_with_global_control_only_fires_when_control_is_set() {
    let mut circuit = DistributedCircuit::new(2, config(2)).unwrap();
    circuit.add(Gate::cnot(0, 1)).unwrap();
    let result = circuit.execute(None, None).unwrap();
    let state = match result {
        ExecutionResult::State(s) => s,
        _ => panic!("expected a state vector"),
    };
    // |00> is unaffected: control qubit 0 is 0.
    assert_close(state[0].real, 1.0);
    for amp in &state[1..] {
        assert_close(amp.real, 0.0);
    }
}

#[test]
fn scenario_2_cnot_flips_when_the_global_control_is_set_in_the_initial_state() {
    let mut circuit = DistributedCircuit::new(2, config(2)).unwrap();
    circuit.add(Gate::cnot(0, 1)).unwrap();
    let mut initial = vec![qdist_core::maths::Complex::zero(); 4];
    initial[2] = qdist_core::maths::Complex::one(); // |10>
    let result = circuit.execute(Some(initial), None).unwrap();
    let state = match result {
        ExecutionResult::State(s) => s,
        _ => panic!("expected a state vector"),
    };
    // |10> -> |11>
    assert_close(state[3].real, 1.0);
    assert_close(state[2].real, 0.0);
}

#[test]
fn scenario_3_global_swap_exchanges_pieces_at_the_target_bit() {
    // Bias the counter so qubit 0 (least touched) is chosen global, leaving
    // 1 and 2 local, so `SWAP(0, 2)` below is a genuine global/local swap.
    let mut circuit = DistributedCircuit::new(3, config(2)).unwrap();
    circuit.add(Gate::x(1)).unwrap();
    circuit.add(Gate::x(2)).unwrap();
    circuit.add(Gate::swap(0, 2)).unwrap();
    let result = circuit.execute(None, None).unwrap();
    let state = match result {
        ExecutionResult::State(s) => s,
        _ => panic!("expected a state vector"),
    };
    // |000> -> X(1) -> |010> -> X(2) -> |011> -> SWAP(0,2) exchanges qubit
    // 0's and qubit 2's values (0 and 1), giving |110>.
    let one_index = state
        .iter()
        .position(|c| (c.real - 1.0).abs() < 1e-9)
        .expect("exactly one amplitude should be populated");
    assert_eq!(one_index, 0b110);
}

#[test]
fn scenario_4_two_global_swap_is_rejected() {
    let mut circuit = DistributedCircuit::new(2, config(4)).unwrap();
    let err = circuit.add(Gate::swap(0, 1));
    // D=4 => nglobal=2, n=2 => every qubit is global already, so `add` itself
    // rejects for insufficient locals before the transformer ever runs.
    assert!(err.is_err());

    // Bias the counter so qubits 0 and 1 (tied, smallest ids) are chosen as
    // the two global qubits, then ask for a SWAP directly between them.
    let mut circuit = DistributedCircuit::new(4, config(4)).unwrap();
    circuit.add(Gate::x(2)).unwrap();
    circuit.add(Gate::x(3)).unwrap();
    circuit.add(Gate::swap(0, 1)).unwrap();
    let err = circuit.execute(None, None).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidGlobalSwap { .. }));
}

#[test]
fn scenario_5_callback_mid_circuit_observes_the_expected_merged_state() {
    // `H(0)` targets the (initially) global qubit, so it is deferred for a
    // reconfiguration; the callback right after it has no targets, so per
    // the Queue Transformer's "special gates are always accepted" rule it is
    // finalized in the very first pass, before `H(0)`'s swap is ever
    // inserted — it is therefore guaranteed to observe the untouched ground
    // state, with an empty swap-reset list (nothing for the Bridge to revert
    // or redo).
    let mut circuit = DistributedCircuit::new(2, config(2)).unwrap();
    let observed: Arc<Mutex<Vec<qdist_core::maths::Complex>>> = Arc::new(Mutex::new(Vec::new()));
    let observed_clone = observed.clone();
    circuit.add(Gate::h(0)).unwrap();
    circuit
        .add(Gate::callback(
            "probe",
            Arc::new(move |state: &[qdist_core::maths::Complex]| {
                *observed_clone.lock().unwrap() = state.to_vec();
            }),
        ))
        .unwrap();
    circuit.add(Gate::h(1)).unwrap();

    let result = circuit.execute(None, None).unwrap();

    let snapshot = observed.lock().unwrap();
    assert_eq!(snapshot.len(), 4);
    assert_close(snapshot[0].real, 1.0);
    assert_close(snapshot[1].real, 0.0);
    assert_close(snapshot[2].real, 0.0);
    assert_close(snapshot[3].real, 0.0);
    drop(snapshot);

    // The full circuit is still equivalent to two independent Hadamards on
    // disjoint qubits: the swap-insert-and-undo machinery exists precisely
    // so the net effect matches the un-transformed circuit regardless of
    // the transformer's internal reordering, giving a uniform superposition.
    match result {
        ExecutionResult::State(state) => {
            assert_eq!(state.len(), 4);
            for amp in &state {
                assert_close(amp.real, 0.5);
                assert_close(amp.imaginary, 0.0);
            }
        }
        _ => panic!("expected a state vector"),
    }
}

#[test]
fn scenario_6_insufficient_qubits_is_rejected() {
    let mut circuit = DistributedCircuit::new(2, config(4)).unwrap();
    let err = circuit.add(Gate::h(0)).unwrap_err();
    assert!(matches!(
        err,
        SchedulerError::InsufficientQubits { n: 2, touched: 1, needed: 2 }
    ));
}

#[test]
fn boundary_minimal_nlocal_plans_and_executes() {
    // N = log2(D) + 1 = 2 for D = 2.
    let mut circuit = DistributedCircuit::new(2, config(2)).unwrap();
    circuit.add(Gate::x(1)).unwrap();
    let result = circuit.execute(None, None).unwrap();
    match result {
        ExecutionResult::State(state) => {
            assert_close(state[1].real, 1.0);
        }
        _ => panic!("expected a state vector"),
    }
}

#[test]
fn boundary_every_gate_on_a_global_qubit_still_executes() {
    let mut circuit = DistributedCircuit::new(2, config(2)).unwrap();
    circuit.add(Gate::x(0)).unwrap();
    circuit.add(Gate::x(0)).unwrap();
    let result = circuit.execute(None, None).unwrap();
    match result {
        ExecutionResult::State(state) => {
            // Two X(0) gates cancel out.
            assert_close(state[0].real, 1.0);
        }
        _ => panic!("expected a state vector"),
    }
}

#[test]
fn merge_split_round_trips_when_global_ids_are_not_an_ascending_prefix() {
    // Qubits 1 and 3 are never touched, so they carry the smallest counters
    // and land as the two global qubits, leaving `global_list = [1, 3]` —
    // not the ascending prefix `[0, 1]` — which forces `Pieces::merge`/
    // `split` onto their general bit-transpose path instead of the cheap
    // concat/chunks one.
    let mut circuit = DistributedCircuit::new(4, config(4)).unwrap();
    circuit.add(Gate::x(0)).unwrap();
    circuit.add(Gate::x(0)).unwrap();
    circuit.add(Gate::x(2)).unwrap();
    circuit.add(Gate::x(2)).unwrap();

    let partition = circuit.plan().unwrap().initial_partition.clone();
    assert_ne!(partition.global_list, vec![0, 1]);

    let result = circuit.execute(None, None).unwrap();
    let state = match result {
        ExecutionResult::State(s) => s,
        _ => panic!("expected a state vector"),
    };
    // Two X(0) and two X(2) each cancel out, so the ground state survives.
    assert_close(state[0].real, 1.0);

    let pieces = Pieces::split(&state, &partition, 4, "host");
    let merged = pieces.merge(&partition, 4, "host");
    assert_eq!(merged, state);
}

#[test]
fn sampling_shots_matches_requested_count() {
    let mut circuit = DistributedCircuit::new(2, config(2)).unwrap();
    circuit.add(Gate::x(1)).unwrap();
    let result = circuit.execute(None, Some(16)).unwrap();
    match result {
        ExecutionResult::Samples(samples) => {
            assert_eq!(samples.len(), 16);
            assert!(samples.iter().all(|&s| s == 1));
        }
        _ => panic!("expected sampled outcomes"),
    }
}
