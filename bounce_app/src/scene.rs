//! Demo scene: a static floor, a few thrown balls and one thruster-driven ship

use kestrel_engine::ecs::Subsystem;
use kestrel_engine::prelude::*;
use kestrel_engine::render::MeshId;

use crate::thruster::{Thruster, THRUSTERS};

/// Entities spawned by [`build`]
pub struct Scene {
    /// Static floor slab
    pub floor: EntityId,
    /// Thrown balls
    pub balls: Vec<EntityId>,
    /// Thruster-driven ship
    pub ship: EntityId,
}

/// Register subsystems and spawn the demo entities
pub fn build(game: &mut Game) -> Result<Scene, EngineError> {
    game.add_subsystem(Subsystem::new(THRUSTERS)?)?;

    let physics = PhysicsSubsystem::new(&game.config().physics)?.with_bounds(WorldBounds::new(
        Vec3::new(-10.0, -1.0, -10.0),
        Vec3::new(10.0, 20.0, 10.0),
    ));
    game.add_subsystem(physics.into_subsystem()?)?;

    let mut camera = Camera::default();
    let (width, height) = game.window().size();
    camera.set_aspect_ratio(width as f32 / height.max(1) as f32);
    camera.set_position(Vec3::new(0.0, 6.0, 18.0));
    camera.look_at(Vec3::new(0.0, 2.0, 0.0), Vec3::y());
    let render = RenderSubsystem::new(game.graphics_mut(), camera)?;
    game.add_subsystem(render.into_subsystem()?)?;

    let cube = game.graphics_mut().upload_mesh(&cube_mesh()?)?;

    let floor = spawn(game, Body::new_static().with_position(Vec3::new(0.0, -1.0, 0.0)), cube, 10.0)?;

    let mut balls = Vec::new();
    for (index, velocity) in [
        Vec3::new(2.0, 6.0, 0.0),
        Vec3::new(-1.5, 8.0, 1.0),
        Vec3::new(0.5, 4.0, -2.5),
    ]
    .into_iter()
    .enumerate()
    {
        let start = Vec3::new(index as f32 * 2.0 - 2.0, 0.5, 0.0);
        let body = Body::new(1.0 + index as f32)?
            .with_position(start)
            .with_velocity(velocity);
        balls.push(spawn(game, body, cube, 0.5)?);
    }

    let ship = game.create_entity();
    game.spawn_component(ship, PhysicsBody::component(Body::new(2.0)?.with_position(Vec3::new(0.0, 0.0, 3.0))))?;
    game.spawn_component(ship, MeshRenderer::component(cube))?;
    game.spawn_component(ship, Thruster::component(Vec3::new(0.0, 30.0, 0.0)))?;
    game.add_entity(ship)?;

    log::info!("Scene ready: floor, {} balls and a ship", balls.len());
    Ok(Scene { floor, balls, ship })
}

fn spawn(game: &mut Game, body: Body, mesh: MeshId, scale: f32) -> Result<EntityId, EngineError> {
    let entity = game.create_entity();
    game.spawn_component(entity, PhysicsBody::component(body))?;
    game.spawn_component(
        entity,
        Component::with_behavior(SubsystemKind::Render, MeshRenderer::new(mesh).with_scale(scale)),
    )?;
    game.add_entity(entity)?;
    Ok(entity)
}

fn cube_mesh() -> Result<Mesh, EngineError> {
    let corners = [
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
    ];
    let vertices: Vec<Vertex> = corners
        .iter()
        .map(|&[x, y, z]: &[f32; 3]| {
            let length = (x * x + y * y + z * z).sqrt();
            Vertex::new([x * 0.5, y * 0.5, z * 0.5], [x / length, y / length, z / length])
        })
        .collect();
    let indices = [
        0, 2, 1, 0, 3, 2, // back
        4, 5, 6, 4, 6, 7, // front
        0, 1, 5, 0, 5, 4, // bottom
        3, 7, 6, 3, 6, 2, // top
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];
    Ok(Mesh::new(&vertices, &indices)?)
}
