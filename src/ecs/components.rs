use glam::Vec3;

/// Dense entity index into every column. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an entity is currently doing. Written only by the decision stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Action {
    #[default]
    Idle = 0,
    MoveToTarget = 1,
    Eat = 2,
    Sleep = 3,
    Flee = 4,
    Attack = 5,
    Explore = 6,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Self::Idle,
        Self::MoveToTarget,
        Self::Eat,
        Self::Sleep,
        Self::Flee,
        Self::Attack,
        Self::Explore,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::MoveToTarget => "Move",
            Self::Eat => "Eat",
            Self::Sleep => "Sleep",
            Self::Flee => "Flee",
            Self::Attack => "Attack",
            Self::Explore => "Explore",
        }
    }

    /// Wire value used by the replay log.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

// ---------------------------------------------------------------------------
// Column groups. Each is a set of parallel Vecs indexed by `EntityId`.
// Only `EntityStore` resizes them.
// ---------------------------------------------------------------------------

/// Hot movement data.
#[derive(Debug, Clone, Default)]
pub struct Transforms {
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    /// Heading in radians, measured from +x.
    pub orientation: Vec<f32>,
}

impl Transforms {
    pub(crate) fn resize(&mut self, len: usize) {
        self.position.resize(len, Vec3::ZERO);
        self.velocity.resize(len, Vec3::ZERO);
        self.orientation.resize(len, 0.0);
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Perception {
    pub view_range: Vec<f32>,
    /// Full field-of-view width in radians.
    pub view_angle: Vec<f32>,
    /// Size of the stimulus buffer after the last perception pass.
    pub visible_count: Vec<u32>,
}

impl Perception {
    pub(crate) fn resize(&mut self, len: usize) {
        self.view_range.resize(len, 0.0);
        self.view_angle.resize(len, 0.0);
        self.visible_count.resize(len, 0);
    }

    pub fn len(&self) -> usize {
        self.view_range.len()
    }
}

/// Drives for the utility AI. Every value lives in [0, 1].
#[derive(Debug, Clone, Default)]
pub struct Needs {
    /// 0 = full, 1 = starving.
    pub hunger: Vec<f32>,
    /// 0 = exhausted, 1 = rested.
    pub energy: Vec<f32>,
    /// 0 = in danger, 1 = safe.
    pub safety: Vec<f32>,
    /// 0 = content, 1 = restless.
    pub curiosity: Vec<f32>,
}

impl Needs {
    pub(crate) fn resize(&mut self, len: usize) {
        self.hunger.resize(len, 0.0);
        self.energy.resize(len, 0.0);
        self.safety.resize(len, 0.0);
        self.curiosity.resize(len, 0.0);
    }

    pub fn len(&self) -> usize {
        self.hunger.len()
    }

    pub fn levels(&self, idx: usize) -> NeedLevels {
        NeedLevels {
            hunger: self.hunger[idx],
            energy: self.energy[idx],
            safety: self.safety[idx],
            curiosity: self.curiosity[idx],
        }
    }
}

/// One entity's needs, copied out of (or into) the `Needs` columns.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeedLevels {
    pub hunger: f32,
    pub energy: f32,
    pub safety: f32,
    pub curiosity: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Actions {
    pub current: Vec<Action>,
    /// Utility score that justified `current`.
    pub utility: Vec<f32>,
    pub target_entity: Vec<Option<EntityId>>,
    pub target_position: Vec<Vec3>,
}

impl Actions {
    pub(crate) fn resize(&mut self, len: usize) {
        self.current.resize(len, Action::Idle);
        self.utility.resize(len, 0.0);
        self.target_entity.resize(len, None);
        self.target_position.resize(len, Vec3::ZERO);
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }
}

/// Cold data. Only the alive flag is consulted by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Health {
    pub current: Vec<f32>,
    pub max: Vec<f32>,
    pub armor_class: Vec<u8>,
    pub alive: Vec<bool>,
}

impl Health {
    pub(crate) fn resize(&mut self, len: usize) {
        self.current.resize(len, 0.0);
        self.max.resize(len, 0.0);
        self.armor_class.resize(len, 0);
        self.alive.resize(len, true);
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }
}

/// Per-observer list of entities seen this tick, in grid traversal order.
/// Rebuilt from scratch by the perception stage.
#[derive(Debug, Clone, Default)]
pub struct StimulusBuffer {
    pub visible: Vec<Vec<EntityId>>,
}

impl StimulusBuffer {
    pub(crate) fn resize(&mut self, len: usize) {
        self.visible.resize_with(len, Vec::new);
    }

    /// Empty every list, keeping allocations.
    pub(crate) fn clear(&mut self) {
        for list in &mut self.visible {
            list.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }
}
