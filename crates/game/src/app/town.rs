use engine::{
    Building, EntityKind, Npc, NpcKind, Scene, ScenePair, StaticEntity, TerrainGrid, TerrainKind,
    Vec2,
};

const MAP_WIDTH: u32 = 30;
const MAP_HEIGHT: u32 = 25;

const OUTSIDE_SPAWN: Vec2 = Vec2 { x: 4.0, y: 12.0 };
const OUTSIDE_ANCHOR: Vec2 = Vec2 { x: 11.0, y: 5.5 };
const INSIDE_ANCHOR: Vec2 = Vec2 { x: 11.0, y: 8.0 };

pub(crate) fn build_scene_pair() -> ScenePair {
    ScenePair::new(build_outside(), build_inside())
}

fn build_outside() -> Scene {
    let mut terrain = TerrainGrid::filled(MAP_WIDTH, MAP_HEIGHT, TerrainKind::Grass);
    // Tree line along the north edge, pond in the south-east corner.
    terrain.fill_rect(0, 0, MAP_WIDTH as i64 - 1, 1, TerrainKind::Forest);
    terrain.fill_rect(23, 16, 27, 19, TerrainKind::Water);

    Scene {
        name: "outside",
        terrain,
        buildings: vec![Building {
            origin: Vec2 { x: 8.0, y: 5.0 },
            size: Vec2 { x: 14.0, y: 14.0 },
        }],
        objects: vec![
            StaticEntity::new(EntityKind::Door, 11.0, 4.5),
            StaticEntity::new(EntityKind::Sign, 5.0, 10.0),
            StaticEntity::new(EntityKind::Tree, 2.0, 6.0),
            StaticEntity::new(EntityKind::Tree, 26.0, 8.0),
            StaticEntity::new(EntityKind::Tree, 3.0, 18.0),
            StaticEntity::sized(EntityKind::Fence, 14.0, 21.0, 6.0, 1.0),
        ],
        npcs: vec![Npc {
            kind: NpcKind::Oak,
            position: Vec2 { x: 6.0, y: 10.0 },
        }],
        spawn_point: OUTSIDE_SPAWN,
        entry_anchor: OUTSIDE_ANCHOR,
    }
}

fn build_inside() -> Scene {
    let mut terrain = TerrainGrid::filled(MAP_WIDTH, MAP_HEIGHT, TerrainKind::Grass);
    terrain.fill_rect(5, 3, 15, 15, TerrainKind::Floor);

    Scene {
        name: "inside",
        terrain,
        buildings: Vec::new(),
        objects: vec![
            StaticEntity::new(EntityKind::Door, 11.0, 3.5),
            StaticEntity::sized(EntityKind::Bed, 6.0, 4.0, 2.0, 1.0),
            StaticEntity::new(EntityKind::Table, 6.0, 6.0),
            StaticEntity::new(EntityKind::Chair, 13.0, 6.0),
            StaticEntity::sized(EntityKind::Shelf, 8.0, 13.0, 2.0, 1.0),
        ],
        npcs: vec![Npc {
            kind: NpcKind::Mom,
            position: Vec2 { x: 8.0, y: 6.0 },
        }],
        spawn_point: INSIDE_ANCHOR,
        entry_anchor: INSIDE_ANCHOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{position_blocked, InputToken, SceneKey, Simulation, TickSnapshot};

    const TICK: f32 = 1.0 / 60.0;

    fn simulation() -> Simulation {
        Simulation::new(build_scene_pair(), SceneKey::Outside)
    }

    fn step_once(sim: &mut Simulation, token: InputToken) -> TickSnapshot {
        sim.input_mut().press(token);
        let snapshot = sim.tick(TICK).expect("tick");
        sim.input_mut().release(token);
        snapshot
    }

    #[test]
    fn both_scenes_share_the_map_dimensions() {
        let pair = build_scene_pair();
        for key in [SceneKey::Outside, SceneKey::Inside] {
            let scene = pair.scene(key);
            assert_eq!(scene.width(), MAP_WIDTH);
            assert_eq!(scene.height(), MAP_HEIGHT);
        }
    }

    #[test]
    fn each_scene_has_exactly_one_door() {
        let pair = build_scene_pair();
        let outside_doors: Vec<_> = pair.scene(SceneKey::Outside).doors().collect();
        let inside_doors: Vec<_> = pair.scene(SceneKey::Inside).doors().collect();

        assert_eq!(outside_doors.len(), 1);
        assert_eq!(outside_doors[0].origin, Vec2 { x: 11.0, y: 4.5 });
        assert_eq!(inside_doors.len(), 1);
        assert_eq!(inside_doors[0].origin, Vec2 { x: 11.0, y: 3.5 });
    }

    #[test]
    fn spawns_and_anchors_are_walkable() {
        let pair = build_scene_pair();
        for key in [SceneKey::Outside, SceneKey::Inside] {
            let scene = pair.scene(key);
            assert!(!position_blocked(scene, scene.spawn_point));
            assert!(!position_blocked(scene, scene.entry_anchor));
        }
    }

    #[test]
    fn terrain_regions_match_the_layout() {
        let pair = build_scene_pair();
        let outside = pair.scene(SceneKey::Outside);
        assert_eq!(outside.terrain.kind_at(5, 0), TerrainKind::Forest);
        assert_eq!(outside.terrain.kind_at(24, 17), TerrainKind::Water);
        assert_eq!(outside.terrain.kind_at(4, 12), TerrainKind::Grass);

        let inside = pair.scene(SceneKey::Inside);
        assert_eq!(inside.terrain.kind_at(10, 10), TerrainKind::Floor);
        assert_eq!(inside.terrain.kind_at(2, 2), TerrainKind::Grass);
    }

    #[test]
    fn the_house_blocks_but_its_doorway_does_not() {
        let outside = build_outside();
        assert!(position_blocked(&outside, Vec2 { x: 11.0, y: 10.0 }));
        assert!(!position_blocked(&outside, Vec2 { x: 11.0, y: 4.5 }));
        assert!(!position_blocked(&outside, Vec2 { x: 5.0, y: 10.0 }));
    }

    #[test]
    fn walking_into_the_doorway_enters_the_house() {
        let mut sim = simulation();
        sim.place_player(Vec2 { x: 11.0, y: 3.0 });

        let snapshot = step_once(&mut sim, InputToken::ArrowDown);
        assert_eq!(snapshot.scene, SceneKey::Inside);
        assert_eq!(snapshot.position, INSIDE_ANCHOR);

        for _ in 0..10 {
            let idle = sim.tick(TICK).expect("tick");
            assert_eq!(idle.scene, SceneKey::Inside);
            assert_eq!(idle.position, INSIDE_ANCHOR);
        }
    }

    #[test]
    fn leaving_the_house_lands_on_the_porch_without_bouncing_back() {
        let mut sim = simulation();
        sim.place_player(Vec2 { x: 11.0, y: 3.0 });
        step_once(&mut sim, InputToken::ArrowDown);
        assert_eq!(sim.active_scene_key(), SceneKey::Inside);

        // Up from (11,8); the step onto (11,4) comes within 0.5 of the
        // inside door and fires the transition back out.
        for _ in 0..4 {
            step_once(&mut sim, InputToken::ArrowUp);
        }
        assert_eq!(sim.active_scene_key(), SceneKey::Outside);
        assert_eq!(sim.player_position(), OUTSIDE_ANCHOR);

        // The porch anchor is only 1.0 tile from the outside door; the
        // proximity latch keeps the door from swallowing the player again,
        // even while stepping straight across the doorway.
        step_once(&mut sim, InputToken::ArrowUp);
        assert_eq!(sim.active_scene_key(), SceneKey::Outside);
        assert_eq!(sim.player_position(), Vec2 { x: 11.0, y: 4.5 });
        step_once(&mut sim, InputToken::ArrowUp);
        assert_eq!(sim.active_scene_key(), SceneKey::Outside);
    }

    #[test]
    fn walking_away_re_arms_the_door() {
        let mut sim = simulation();
        sim.place_player(Vec2 { x: 11.0, y: 3.0 });
        step_once(&mut sim, InputToken::ArrowDown);
        for _ in 0..4 {
            step_once(&mut sim, InputToken::ArrowUp);
        }
        assert_eq!(sim.active_scene_key(), SceneKey::Outside);

        // Leave the radius northward, then walk back in.
        step_once(&mut sim, InputToken::ArrowUp); // (11, 4.5)
        step_once(&mut sim, InputToken::ArrowUp); // (11, 3.5), still near
        step_once(&mut sim, InputToken::ArrowUp); // (11, 2.5), latch clears
        assert_eq!(sim.active_scene_key(), SceneKey::Outside);

        step_once(&mut sim, InputToken::ArrowDown); // (11, 3.5), rising edge
        assert_eq!(sim.active_scene_key(), SceneKey::Inside);
        assert_eq!(sim.player_position(), INSIDE_ANCHOR);
    }

    #[test]
    fn reset_outside_returns_to_the_village_spawn() {
        let mut sim = simulation();
        step_once(&mut sim, InputToken::ArrowRight);
        step_once(&mut sim, InputToken::ArrowUp);
        sim.input_mut().press(InputToken::Reset);

        let snapshot = sim.tick(TICK).expect("tick");
        assert_eq!(snapshot.scene, SceneKey::Outside);
        assert_eq!(snapshot.position, OUTSIDE_SPAWN);
        assert_eq!(snapshot.animation_frame, 0);
    }

    #[test]
    fn reset_inside_stays_inside_at_its_own_spawn() {
        let mut sim = simulation();
        sim.place_player(Vec2 { x: 11.0, y: 3.0 });
        step_once(&mut sim, InputToken::ArrowDown);
        step_once(&mut sim, InputToken::ArrowLeft);
        assert_eq!(sim.player_position(), Vec2 { x: 10.0, y: 8.0 });

        sim.input_mut().press(InputToken::Reset);
        let snapshot = sim.tick(TICK).expect("tick");
        assert_eq!(snapshot.scene, SceneKey::Inside);
        assert_eq!(snapshot.position, INSIDE_ANCHOR);
    }

    #[test]
    fn holding_a_key_repeats_steps_up_to_the_house_wall() {
        let mut sim = simulation();
        // Hold right from spawn for the 660ms repeat horizon: the initial
        // press plus three repeats cover four tiles of open grass.
        sim.input_mut().press(InputToken::ArrowRight);
        for _ in 0..40 {
            sim.tick(TICK).expect("tick");
        }
        assert_eq!(sim.player_position(), Vec2 { x: 8.0, y: 12.0 });
    }
}
