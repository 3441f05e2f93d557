use super::*;
use crate::ecs::{Component, Subsystem, SubsystemKind};

const A: SubsystemKind = SubsystemKind::Named("a");
const B: SubsystemKind = SubsystemKind::Named("b");
const C: SubsystemKind = SubsystemKind::Named("c");

fn traced_game(trace: &Trace) -> Game {
    let mut game = game();
    for (kind, label) in [(A, "A"), (B, "B"), (C, "C")] {
        let hooks = TraceHooks { label, trace: Rc::clone(trace) };
        game.add_subsystem(Subsystem::with_hooks(kind, hooks).unwrap()).unwrap();
    }
    game
}

#[test]
fn test_subsystems_run_in_registration_order() {
    let trace = trace();
    let mut game = traced_game(&trace);

    let first = game.create_entity();
    for (kind, label) in [(C, "C1"), (A, "A1"), (B, "B1")] {
        game.spawn_component(first, Component::with_behavior(kind, TraceBehavior::new(label, &trace)))
            .unwrap();
    }
    let second = game.create_entity();
    for (kind, label) in [(A, "A2"), (C, "C2")] {
        game.spawn_component(second, Component::with_behavior(kind, TraceBehavior::new(label, &trace)))
            .unwrap();
    }
    game.add_entity(first).unwrap();
    game.add_entity(second).unwrap();
    trace.borrow_mut().clear();

    game.frame(1.0 / 60.0).unwrap();

    assert_eq!(
        *trace.borrow(),
        vec![
            "A:before", "A1:update", "A2:update", "A:after",
            "B:before", "B1:update", "B:after",
            "C:before", "C1:update", "C2:update", "C:after",
        ]
    );
}

#[test]
fn test_components_claimed_when_entity_registers() {
    let trace = trace();
    let mut game = traced_game(&trace);

    let entity = game.create_entity();
    game.spawn_component(entity, Component::with_behavior(B, TraceBehavior::new("B1", &trace)))
        .unwrap();
    assert!(trace.borrow().is_empty());
    assert!(game.registry().subsystem(B).unwrap().is_empty());

    game.add_entity(entity).unwrap();
    assert_eq!(*trace.borrow(), vec!["B:added"]);

    // Attaching after registration claims immediately
    game.spawn_component(entity, Component::with_behavior(A, TraceBehavior::new("A1", &trace)))
        .unwrap();
    assert_eq!(*trace.borrow(), vec!["B:added", "A:added"]);
    assert_eq!(game.registry().subsystem(A).unwrap().len(), 1);
}

#[test]
fn test_members_update_in_attachment_order() {
    let trace = trace();
    let mut game = traced_game(&trace);

    let mut entities = Vec::new();
    for label in ["first", "second", "third"] {
        let entity = game.create_entity();
        game.spawn_component(entity, Component::with_behavior(A, TraceBehavior::new(label, &trace)))
            .unwrap();
        entities.push(entity);
    }
    // Registration order decides claim order
    for entity in entities.iter().rev() {
        game.add_entity(*entity).unwrap();
    }
    trace.borrow_mut().clear();

    game.frame(0.0).unwrap();

    let updates: Vec<String> = trace
        .borrow()
        .iter()
        .filter(|event| event.ends_with(":update"))
        .cloned()
        .collect();
    assert_eq!(updates, vec!["third:update", "second:update", "first:update"]);
}

#[test]
fn test_component_without_behavior_is_skipped() {
    let trace = trace();
    let mut game = traced_game(&trace);

    let entity = game.create_entity();
    game.spawn_component(entity, Component::new(A)).unwrap();
    game.add_entity(entity).unwrap();
    trace.borrow_mut().clear();

    game.frame(0.1).unwrap();
    assert_eq!(&trace.borrow()[..2], &["A:before", "A:after"]);
}
