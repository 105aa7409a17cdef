use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn distance_to(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Purely a rendering hint; terrain never affects collision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TerrainKind {
    #[default]
    Grass,
    Floor,
    Water,
    Forest,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerrainError {
    #[error("terrain tile count {actual} does not match {width}x{height}")]
    TileCountMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}

#[derive(Debug, Clone)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    tiles: Vec<TerrainKind>,
}

impl TerrainGrid {
    pub fn new(width: u32, height: u32, tiles: Vec<TerrainKind>) -> Result<Self, TerrainError> {
        let expected = (width as usize) * (height as usize);
        if tiles.len() != expected {
            return Err(TerrainError::TileCountMismatch {
                width,
                height,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn filled(width: u32, height: u32, kind: TerrainKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-range queries fall back to grass instead of failing the tick.
    pub fn kind_at(&self, x: i64, y: i64) -> TerrainKind {
        match self.index_of(x, y) {
            Some(index) => self.tiles[index],
            None => TerrainKind::default(),
        }
    }

    pub fn set(&mut self, x: i64, y: i64, kind: TerrainKind) {
        if let Some(index) = self.index_of(x, y) {
            self.tiles[index] = kind;
        }
    }

    /// Fills the inclusive cell rectangle, clipped to the grid.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, kind: TerrainKind) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, kind);
            }
        }
    }

    fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tree,
    Fence,
    Sign,
    Door,
    Bed,
    Table,
    Chair,
    Shelf,
}

const ENTITY_KIND_COUNT: usize = 8;

// Behavior per kind lives in one table instead of per-shape conditionals.
// Doors and signs are walkable; everything else blocks.
const BLOCKS_BY_KIND: [bool; ENTITY_KIND_COUNT] = [
    true,  // Tree
    true,  // Fence
    false, // Sign
    false, // Door
    true,  // Bed
    true,  // Table
    true,  // Chair
    true,  // Shelf
];

impl EntityKind {
    const fn index(self) -> usize {
        match self {
            EntityKind::Tree => 0,
            EntityKind::Fence => 1,
            EntityKind::Sign => 2,
            EntityKind::Door => 3,
            EntityKind::Bed => 4,
            EntityKind::Table => 5,
            EntityKind::Chair => 6,
            EntityKind::Shelf => 7,
        }
    }

    pub fn blocks(self) -> bool {
        BLOCKS_BY_KIND[self.index()]
    }

    pub fn is_door(self) -> bool {
        matches!(self, EntityKind::Door)
    }
}

/// Placed scenery. Immutable after scene construction. Doors sit at
/// half-tile origins in the shipped content, hence `Vec2` rather than a
/// cell index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticEntity {
    pub kind: EntityKind,
    pub origin: Vec2,
    pub size: Vec2,
}

impl StaticEntity {
    pub fn new(kind: EntityKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            origin: Vec2 { x, y },
            size: Vec2 { x: 1.0, y: 1.0 },
        }
    }

    pub fn sized(kind: EntityKind, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            kind,
            origin: Vec2 { x, y },
            size: Vec2 { x: w, y: h },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    pub origin: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NpcKind {
    Oak,
    Mom,
    Rival,
}

/// Static decoration. NPCs never move and never block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Npc {
    pub kind: NpcKind,
    pub position: Vec2,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub name: &'static str,
    pub terrain: TerrainGrid,
    pub buildings: Vec<Building>,
    pub objects: Vec<StaticEntity>,
    pub npcs: Vec<Npc>,
    pub spawn_point: Vec2,
    pub entry_anchor: Vec2,
}

impl Scene {
    pub fn width(&self) -> u32 {
        self.terrain.width()
    }

    pub fn height(&self) -> u32 {
        self.terrain.height()
    }

    pub fn doors(&self) -> impl Iterator<Item = &StaticEntity> {
        self.objects.iter().filter(|object| object.kind.is_door())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Outside,
    Inside,
}

impl SceneKey {
    /// The scene a door in this scene leads to.
    pub fn linked(self) -> SceneKey {
        match self {
            SceneKey::Outside => SceneKey::Inside,
            SceneKey::Inside => SceneKey::Outside,
        }
    }
}

/// Exactly two statically linked scenes; only the key selecting the active
/// one ever changes after construction.
#[derive(Debug, Clone)]
pub struct ScenePair {
    outside: Scene,
    inside: Scene,
}

impl ScenePair {
    pub fn new(outside: Scene, inside: Scene) -> Self {
        Self { outside, inside }
    }

    pub fn scene(&self, key: SceneKey) -> &Scene {
        match key {
            SceneKey::Outside => &self.outside,
            SceneKey::Inside => &self.inside,
        }
    }
}
