// tests/synthesis_tests.rs

use qpulse::core::matrix::{self, Matrix2, Matrix4};
use qpulse::synthesis::{Slot, classify_slots};
use qpulse::{
    Decomposition, EntanglingPrimitive, EulerDecomposition, GateTag, InstructionCode, QpulseError, Qubit,
    RelevantParameters, Rotation, SubGateStep, Synthesizer, ZyzDecomposer, synthesize,
};

use approx::assert_abs_diff_eq;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, PI};

// A random single-qubit gate built from known ZYZ angles, with the rotations
// in application order.
fn random_local(rng: &mut StdRng) -> (Matrix2, Vec<Rotation>) {
    let rotations = vec![
        Rotation::z(rng.random_range(-PI..PI)),
        Rotation::y(rng.random_range(0.1..PI)),
        Rotation::z(rng.random_range(-PI..PI)),
    ];
    let m = rotations
        .iter()
        .fold(matrix::identity::<2>(), |acc, r| matrix::matmul(&r.matrix(), &acc));
    (m, rotations)
}

struct RandomCircuit {
    unitary: Matrix4,
    decomposition: Decomposition,
    locals: Vec<(Matrix2, Vec<Rotation>)>,
}

// Local layer, then up to three iSwap layers each followed by a local layer.
fn random_circuit(rng: &mut StdRng) -> RandomCircuit {
    let layers = rng.random_range(0..=3);
    let mut steps = Vec::new();
    let mut locals = Vec::new();
    for layer in 0..=layers {
        if layer > 0 {
            steps.push(SubGateStep::Entangling { matrix: matrix::iswap() });
        }
        for qubit in [Qubit::Q0, Qubit::Q1] {
            let (m, rotations) = random_local(rng);
            steps.push(SubGateStep::Single { qubit, matrix: m });
            locals.push((m, rotations));
        }
    }
    let global_phase = rng.random_range(-PI..PI);
    let product = steps
        .iter()
        .fold(matrix::identity::<4>(), |acc, step| matrix::matmul(&step.embedded(), &acc));
    RandomCircuit {
        unitary: matrix::scale(&product, Complex64::from_polar(1.0, global_phase)),
        decomposition: Decomposition { steps, global_phase },
        locals,
    }
}

fn codes(instructions: &[qpulse::PhysicalInstruction]) -> Vec<InstructionCode> {
    instructions.iter().map(|i| i.code).collect()
}

#[test]
fn test_random_unitaries_reconstruct_with_builtin_euler() -> Result<(), QpulseError> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let circuit = random_circuit(&mut rng);
        let reported = circuit.decomposition.clone();
        let stub = move |_: &Matrix4, _: EntanglingPrimitive| -> Result<Decomposition, QpulseError> {
            Ok(reported.clone())
        };
        let mut params = RelevantParameters::default();
        let set = Synthesizer::new(stub).decompose(&circuit.unitary, &mut params)?;

        assert!(matrix::approx_eq(&set.reconstruct(), &circuit.unitary, 1e-10));
        for instruction in &set.instructions {
            assert!(matrix::is_unitary(&instruction.underlying_gate, 1e-10));
        }
    }
    Ok(())
}

#[test]
fn test_random_unitaries_reconstruct_with_stub_euler() -> Result<(), QpulseError> {
    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..50 {
        let circuit = random_circuit(&mut rng);
        // Answers with the angles each local gate was built from.
        let locals = circuit.locals.clone();
        let euler = move |m: &Matrix2| -> Result<EulerDecomposition, QpulseError> {
            locals
                .iter()
                .find(|(local, _)| matrix::approx_eq(local, m, 1e-14))
                .map(|(_, rotations)| EulerDecomposition::exact(rotations.clone()))
                .ok_or_else(|| QpulseError::InternalInconsistency { message: "unknown local gate".to_string() })
        };
        let mut params = RelevantParameters::default();
        let set = synthesize(&circuit.decomposition, EntanglingPrimitive::ISwap, &euler, &mut params)?;

        let entangling = circuit
            .decomposition
            .steps
            .iter()
            .filter(|s| s.tag() == GateTag::Entangling)
            .count();
        assert_eq!(set.len(), entangling + 3 * circuit.locals.len());
        assert_abs_diff_eq!(set.global_phase, circuit.decomposition.global_phase, epsilon = 1e-15);
        set.verify(&circuit.unitary)?;
    }
    Ok(())
}

#[test]
fn test_slot_classification() -> Result<(), QpulseError> {
    let z = Rotation::z(0.2);
    let y = Rotation::y(0.4);
    assert!(classify_slots(&[])?.is_empty());
    assert_eq!(classify_slots(&[z])?, &[Slot::Z]);
    assert_eq!(classify_slots(&[y])?, &[Slot::Y]);
    assert_eq!(classify_slots(&[z, y])?, &[Slot::Z, Slot::Y]);
    assert_eq!(classify_slots(&[y, z])?, &[Slot::Y, Slot::Z]);
    assert_eq!(classify_slots(&[z, y, z])?, &[Slot::Z, Slot::Y, Slot::Z]);
    // The template comes from the shape of the sequence alone.
    assert_eq!(classify_slots(&[y, y, y])?, &[Slot::Z, Slot::Y, Slot::Z]);
    Ok(())
}

#[test]
fn test_two_rotation_y_first_emits_drive_then_virtual_z() -> Result<(), QpulseError> {
    let decomposition = Decomposition {
        steps: vec![SubGateStep::Single { qubit: Qubit::Q0, matrix: matrix::identity::<2>() }],
        global_phase: 0.0,
    };
    let euler = |_: &Matrix2| -> Result<EulerDecomposition, QpulseError> {
        Ok(EulerDecomposition::exact(vec![Rotation::y(0.9), Rotation::z(-0.2)]))
    };
    let mut params = RelevantParameters::default();
    let set = synthesize(&decomposition, EntanglingPrimitive::ISwap, &euler, &mut params)?;
    assert_eq!(codes(&set.instructions), vec![InstructionCode::Ry, InstructionCode::Rz]);
    assert_eq!(set.instructions[0].angle, Some(0.9));
    assert_eq!(set.instructions[1].angle, Some(-0.2));
    Ok(())
}

#[test]
fn test_phase_accumulates_in_emission_order() -> Result<(), QpulseError> {
    let decomposition = Decomposition {
        steps: vec![
            SubGateStep::Single { qubit: Qubit::Q0, matrix: matrix::identity::<2>() },
            SubGateStep::Single { qubit: Qubit::Q0, matrix: matrix::identity::<2>() },
            SubGateStep::Single { qubit: Qubit::Q1, matrix: matrix::identity::<2>() },
        ],
        global_phase: 0.0,
    };
    let queue = RefCell::new(VecDeque::from(vec![
        vec![Rotation::z(0.3)],
        vec![Rotation::z(0.4), Rotation::y(1.0), Rotation::z(0.5)],
        vec![Rotation::y(0.6)],
    ]));
    let euler = |_: &Matrix2| -> Result<EulerDecomposition, QpulseError> {
        let rotations = queue.borrow_mut().pop_front().unwrap_or_default();
        Ok(EulerDecomposition::exact(rotations))
    };

    let mut params = RelevantParameters::default();
    params.q1_relative_phase = 0.1;
    let set = synthesize(&decomposition, EntanglingPrimitive::ISwap, &euler, &mut params)?;
    assert_eq!(
        codes(&set.instructions),
        vec![InstructionCode::Rz, InstructionCode::Rz, InstructionCode::Ry, InstructionCode::Rz, InstructionCode::Ry]
    );

    // Both virtual Zs before the drive count, the one after it does not.
    let q0_drive = set.instructions[2].drive.ok_or_else(|| QpulseError::InternalInconsistency {
        message: "RY without drive".to_string(),
    })?;
    assert_abs_diff_eq!(q0_drive.phase, FRAC_PI_2 + 0.7, epsilon = 1e-12);
    assert_abs_diff_eq!(params.q0_relative_phase, 1.2, epsilon = 1e-12);

    // Qubit 1 only sees its own seeded phase.
    let q1_drive = set.instructions[4].drive.ok_or_else(|| QpulseError::InternalInconsistency {
        message: "RY without drive".to_string(),
    })?;
    assert_abs_diff_eq!(q1_drive.phase, FRAC_PI_2 + 0.1, epsilon = 1e-12);
    assert_eq!(q1_drive.frequency_hz, 5.0e9);
    assert_abs_diff_eq!(params.q1_relative_phase, 0.1, epsilon = 1e-15);
    Ok(())
}

#[test]
fn test_non_unitary_input_never_reaches_the_synthesizer() {
    let reached = RefCell::new(false);
    let stub = |_: &Matrix4, _: EntanglingPrimitive| -> Result<Decomposition, QpulseError> {
        *reached.borrow_mut() = true;
        Ok(Decomposition { steps: vec![], global_phase: 0.0 })
    };
    let mut not_unitary = matrix::identity::<4>();
    not_unitary[3][0] = Complex64::new(0.5, 0.0);

    let mut params = RelevantParameters::default();
    let result = Synthesizer::new(&stub).decompose(&not_unitary, &mut params);
    assert!(matches!(result, Err(QpulseError::Validation { .. })));
    assert!(!*reached.borrow());
}

#[test]
fn test_cz_primitive_is_unsupported() {
    let stub = |_: &Matrix4, _: EntanglingPrimitive| -> Result<Decomposition, QpulseError> {
        Ok(Decomposition { steps: vec![], global_phase: 0.0 })
    };
    let synthesizer = Synthesizer::with_collaborators(stub, ZyzDecomposer::default(), EntanglingPrimitive::Cz);
    let mut params = RelevantParameters::default();
    let err = synthesizer
        .decompose(&matrix::identity::<4>(), &mut params)
        .expect_err("CZ has no instruction template");
    assert!(matches!(err, QpulseError::UnsupportedConfiguration { .. }));
    assert!(err.to_string().contains("CZ"));
}

#[test]
fn test_faulty_synthesizer_is_reported() {
    // Claims the identity is a single iSwap.
    let stub = |_: &Matrix4, _: EntanglingPrimitive| -> Result<Decomposition, QpulseError> {
        Ok(Decomposition {
            steps: vec![SubGateStep::Entangling { matrix: matrix::iswap() }],
            global_phase: 0.0,
        })
    };
    let mut params = RelevantParameters::default();
    let result = Synthesizer::new(stub).decompose(&matrix::identity::<4>(), &mut params);
    assert!(matches!(result, Err(QpulseError::InternalInconsistency { .. })));
}

#[test]
fn test_instruction_set_display_lists_every_instruction() -> Result<(), QpulseError> {
    let decomposition = Decomposition {
        steps: vec![
            SubGateStep::Single { qubit: Qubit::Q1, matrix: Rotation::y(FRAC_PI_2).matrix() },
            SubGateStep::Entangling { matrix: matrix::iswap() },
        ],
        global_phase: 0.0,
    };
    let mut params = RelevantParameters::default();
    let set = synthesize(&decomposition, EntanglingPrimitive::ISwap, &ZyzDecomposer::default(), &mut params)?;
    let rendered = set.to_string();
    assert!(rendered.contains("2 instructions"));
    assert!(rendered.contains("RY"));
    assert!(rendered.contains("ISWAP"));
    assert!(rendered.contains("Qubit 1"));
    Ok(())
}
