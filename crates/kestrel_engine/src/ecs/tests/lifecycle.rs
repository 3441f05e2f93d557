use super::*;
use crate::ecs::components::{MeshRenderer, PhysicsBody};
use crate::ecs::subsystems::PhysicsSubsystem;
use crate::ecs::{Component, EcsError, Registry, Subsystem, SubsystemKind};
use crate::foundation::math::Vec3;
use crate::input::InputState;
use crate::physics::Body;
use crate::render::MeshId;

const TAGS: SubsystemKind = SubsystemKind::Named("tags");

fn physics_game() -> Game {
    let mut game = game();
    let physics = PhysicsSubsystem::new(&game.config().physics).unwrap();
    game.add_subsystem(physics.into_subsystem().unwrap()).unwrap();
    game
}

fn world_len(game: &Game) -> usize {
    game.registry()
        .subsystem_hooks::<PhysicsSubsystem>(SubsystemKind::Physics)
        .unwrap()
        .world()
        .len()
}

#[test]
fn test_component_attaches_only_once() {
    let mut game = game();
    let first = game.create_entity();
    let second = game.create_entity();
    let component = game.create_component(Component::new(TAGS));

    game.attach_component(component, first).unwrap();
    let err = game.attach_component(component, second).unwrap_err();

    assert!(matches!(err, EngineError::Ecs(EcsError::AlreadyAttached(id)) if id == component));
    assert_eq!(game.registry().component(component).unwrap().entity(), Some(first));
    assert!(game.registry().entity(second).unwrap().components().is_empty());
}

#[test]
fn test_one_component_per_kind() {
    let mut game = game();
    let entity = game.create_entity();
    game.spawn_component(entity, Component::new(TAGS)).unwrap();

    let err = game.spawn_component(entity, Component::new(TAGS)).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Ecs(EcsError::DuplicateComponent { kind: TAGS, .. })
    ));
    assert_eq!(game.registry().entity(entity).unwrap().components().len(), 1);
}

#[test]
fn test_missing_subsystem_leaves_entity_unregistered() {
    let mut game = physics_game();
    let entity = game.create_entity();
    let body = game
        .spawn_component(entity, PhysicsBody::component(Body::new(1.0).unwrap()))
        .unwrap();
    game.spawn_component(entity, Component::new(TAGS)).unwrap();

    let err = game.add_entity(entity).unwrap_err();
    assert!(matches!(err, EngineError::Ecs(EcsError::MissingSubsystem(TAGS))));
    assert!(!game.registry().entity(entity).unwrap().is_registered());
    assert!(!game.registry().component(body).unwrap().is_claimed());
    assert_eq!(world_len(&game), 0);
}

#[test]
fn test_rejected_claim_rolls_back_registration() {
    let trace = trace();
    let mut game = physics_game();
    game.add_subsystem(
        Subsystem::with_hooks(TAGS, TraceHooks { label: "tags", trace: Rc::clone(&trace) }).unwrap(),
    )
    .unwrap();

    let entity = game.create_entity();
    let tag = game
        .spawn_component(entity, Component::with_behavior(TAGS, TraceBehavior::new("tag", &trace)))
        .unwrap();
    let bare = game
        .spawn_component(entity, Component::new(SubsystemKind::Physics))
        .unwrap();

    let err = game.add_entity(entity).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Ecs(EcsError::UnexpectedBehavior { component, .. }) if component == bare
    ));
    assert!(!game.registry().entity(entity).unwrap().is_registered());
    assert!(!game.registry().component(tag).unwrap().is_claimed());
    assert!(!game.registry().component(bare).unwrap().is_claimed());
    assert!(game.registry().subsystem(TAGS).unwrap().is_empty());
    assert!(game.registry().subsystem(SubsystemKind::Physics).unwrap().is_empty());
    assert_eq!(*trace.borrow(), vec!["tags:added", "tags:removed"]);

    game.destroy_component(bare).unwrap();
    game.spawn_component(entity, PhysicsBody::component(Body::new(1.0).unwrap()))
        .unwrap();
    game.add_entity(entity).unwrap();

    assert!(game.registry().entity(entity).unwrap().is_registered());
    assert!(game.registry().component(tag).unwrap().is_claimed());
    assert_eq!(world_len(&game), 1);
}

#[test]
fn test_rejected_claim_returns_linked_body() {
    const STRICT: SubsystemKind = SubsystemKind::Named("strict");

    let mut game = physics_game();
    let strict = PhysicsSubsystem::new(&game.config().physics).unwrap();
    game.add_subsystem(Subsystem::with_hooks(STRICT, strict).unwrap())
        .unwrap();

    let entity = game.create_entity();
    let body = game
        .spawn_component(
            entity,
            PhysicsBody::component(Body::new(1.0).unwrap().with_position(Vec3::y())),
        )
        .unwrap();
    let bare = game.spawn_component(entity, Component::new(STRICT)).unwrap();

    assert!(game.add_entity(entity).is_err());
    assert_eq!(world_len(&game), 0);
    let pending = game
        .registry()
        .behavior::<PhysicsBody>(body)
        .and_then(PhysicsBody::pending)
        .unwrap();
    assert_eq!(pending.position(), Vec3::y());

    game.destroy_component(bare).unwrap();
    game.add_entity(entity).unwrap();
    assert_eq!(world_len(&game), 1);
    assert!(game.registry().behavior::<PhysicsBody>(body).unwrap().handle().is_some());
}

#[test]
fn test_rejected_attach_leaves_registered_entity_unchanged() {
    let mut game = physics_game();
    let entity = game.create_entity();
    game.add_entity(entity).unwrap();

    let bare = game.create_component(Component::new(SubsystemKind::Physics));
    let err = game.attach_component(bare, entity).unwrap_err();
    assert!(matches!(err, EngineError::Ecs(EcsError::UnexpectedBehavior { .. })));

    let record = game.registry().component(bare).unwrap();
    assert!(!record.is_attached());
    assert!(!record.is_claimed());
    assert!(game.registry().entity(entity).unwrap().components().is_empty());
    assert!(game.registry().subsystem(SubsystemKind::Physics).unwrap().is_empty());

    assert!(game
        .spawn_component(entity, Component::new(SubsystemKind::Physics))
        .is_err());
    assert_eq!(game.registry().component_count(), 1);

    game.spawn_component(entity, PhysicsBody::component(Body::new(1.0).unwrap()))
        .unwrap();
    assert_eq!(world_len(&game), 1);
}

#[test]
fn test_entity_registers_once() {
    let mut game = game();
    let entity = game.create_entity();
    game.add_entity(entity).unwrap();

    let err = game.add_entity(entity).unwrap_err();
    assert!(matches!(err, EngineError::Ecs(EcsError::AlreadyRegistered(id)) if id == entity));
}

#[test]
fn test_subsystem_kind_registers_once() {
    let mut game = game();
    game.add_subsystem(Subsystem::new(TAGS).unwrap()).unwrap();
    let err = game.add_subsystem(Subsystem::new(TAGS).unwrap()).unwrap_err();
    assert!(matches!(err, EngineError::Ecs(EcsError::DuplicateSubsystem(TAGS))));
}

#[test]
fn test_component_claimed_only_once() {
    let mut registry = Registry::new();
    registry.add_subsystem(Subsystem::new(TAGS).unwrap()).unwrap();
    let component = registry.create_component(Component::new(TAGS));

    let mut graphics = RecordingBackend::new();
    let input = InputState::new();
    let mut ctx = FrameContext::new(&mut registry, &mut graphics, &input);

    ctx.claim(component).unwrap();
    let err = ctx.claim(component).unwrap_err();
    assert!(matches!(err, EngineError::Ecs(EcsError::AlreadyClaimed(id)) if id == component));
    assert_eq!(registry.subsystem(TAGS).unwrap().members(), vec![component]);
}

#[test]
fn test_sibling_lookup_by_kind() {
    let mut game = game();
    let entity = game.create_entity();
    let renderer = game
        .spawn_component(entity, MeshRenderer::component(MeshId(1)))
        .unwrap();
    let tags = game.spawn_component(entity, Component::new(TAGS)).unwrap();
    let body = game
        .spawn_component(entity, PhysicsBody::component(Body::new(1.0).unwrap()))
        .unwrap();

    let registry = game.registry();
    assert_eq!(registry.get_component(entity, SubsystemKind::Physics), Some(body));
    assert_eq!(registry.get_component(entity, SubsystemKind::Render), Some(renderer));
    assert_eq!(registry.get_component(entity, TAGS), Some(tags));
    assert_eq!(registry.get_component(entity, SubsystemKind::Named("absent")), None);

    assert!(registry.sibling::<PhysicsBody>(entity, SubsystemKind::Physics).is_ok());
    assert_eq!(
        registry
            .sibling::<PhysicsBody>(entity, SubsystemKind::Render)
            .unwrap_err(),
        EcsError::MissingSibling { entity, kind: SubsystemKind::Render }
    );
}

#[test]
fn test_destroy_entity_cascades_cleanup() {
    let trace = trace();
    let mut game = physics_game();
    game.add_subsystem(
        Subsystem::with_hooks(TAGS, TraceHooks { label: "tags", trace: Rc::clone(&trace) }).unwrap(),
    )
    .unwrap();

    let entity = game.create_entity();
    let body = game
        .spawn_component(entity, PhysicsBody::component(Body::new(1.0).unwrap()))
        .unwrap();
    let tag = game
        .spawn_component(entity, Component::with_behavior(TAGS, TraceBehavior::new("tag", &trace)))
        .unwrap();
    game.add_entity(entity).unwrap();
    assert_eq!(world_len(&game), 1);

    game.destroy_entity(entity).unwrap();

    assert_eq!(*trace.borrow(), vec!["tags:added", "tags:removed", "tag:cleanup"]);
    assert_eq!(world_len(&game), 0);
    assert!(game.registry().entity(entity).is_none());
    assert!(game.registry().component(body).is_none());
    assert!(game.registry().component(tag).is_none());
    assert!(game.registry().subsystem(TAGS).unwrap().is_empty());
    assert!(game.registry().subsystem(SubsystemKind::Physics).unwrap().is_empty());
    assert!(matches!(
        game.destroy_entity(entity).unwrap_err(),
        EngineError::Ecs(EcsError::UnknownEntity(_))
    ));
}

#[test]
fn test_destroy_single_component_detaches_it() {
    let mut game = physics_game();
    let entity = game.create_entity();
    let body = game
        .spawn_component(
            entity,
            PhysicsBody::component(Body::new(1.0).unwrap().with_velocity(Vec3::x())),
        )
        .unwrap();
    game.add_entity(entity).unwrap();

    game.destroy_component(body).unwrap();

    assert!(game.registry().entity(entity).unwrap().components().is_empty());
    assert_eq!(world_len(&game), 0);
    game.frame(1.0 / 60.0).unwrap();
}

#[test]
fn test_shutdown_cleans_up_every_component() {
    let trace = trace();
    let mut game = game();
    game.add_subsystem(Subsystem::new(TAGS).unwrap()).unwrap();

    for label in ["one", "two"] {
        let entity = game.create_entity();
        game.spawn_component(entity, Component::with_behavior(TAGS, TraceBehavior::new(label, &trace)))
            .unwrap();
        game.add_entity(entity).unwrap();
    }
    let loose = game.create_entity();
    game.spawn_component(loose, Component::with_behavior(TAGS, TraceBehavior::new("loose", &trace)))
        .unwrap();

    game.shutdown().unwrap();

    let mut cleaned = trace.borrow().clone();
    cleaned.sort();
    assert_eq!(cleaned, vec!["loose:cleanup", "one:cleanup", "two:cleanup"]);
}
