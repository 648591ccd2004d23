//! Block kinds and their course footprints

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BLOCK_DEPTH, DEFAULT_BLOCK_WIDTH};

/// Course block types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Start,
    /// Bar rotating about the vertical axis
    Spinner,
    /// Bar bobbing up and down
    Limbo,
    /// Slab swinging side to side
    Axe,
    End,
    /// Plain floor block registered by name
    Custom(String),
}

impl BlockKind {
    /// Obstacle kinds the generator picks from by default
    pub fn obstacles() -> Vec<BlockKind> {
        vec![BlockKind::Axe, BlockKind::Limbo, BlockKind::Spinner]
    }

    pub fn name(&self) -> &str {
        match self {
            BlockKind::Start => "Start",
            BlockKind::Spinner => "Spinner",
            BlockKind::Limbo => "Limbo",
            BlockKind::Axe => "Axe",
            BlockKind::End => "End",
            BlockKind::Custom(name) => name,
        }
    }
}

/// Footprint of a block on the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub kind: BlockKind,
    /// Extent along the course axis
    pub depth: f32,
    /// Lateral extent
    pub width: f32,
}

impl BlockSpec {
    pub fn new(kind: BlockKind, depth: f32, width: f32) -> Self {
        Self { kind, depth, width }
    }

    fn fallback(kind: &BlockKind) -> Self {
        Self::new(kind.clone(), DEFAULT_BLOCK_DEPTH, DEFAULT_BLOCK_WIDTH)
    }
}

/// Registry of block footprints by kind
#[derive(Debug, Clone)]
pub struct BlockCatalog {
    specs: HashMap<BlockKind, BlockSpec>,
}

impl BlockCatalog {
    pub fn empty() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    pub fn register(&mut self, spec: BlockSpec) {
        self.specs.insert(spec.kind.clone(), spec);
    }

    pub fn contains(&self, kind: &BlockKind) -> bool {
        self.specs.contains_key(kind)
    }

    /// Register defaults for any candidate kind the catalog does not know
    pub fn ensure(&mut self, candidates: &[BlockKind]) {
        for kind in candidates {
            if !self.specs.contains_key(kind) {
                log::warn!(
                    "Dimensions not defined for block type {}, using default depth/width {}",
                    kind.name(),
                    DEFAULT_BLOCK_DEPTH
                );
                self.register(BlockSpec::fallback(kind));
            }
        }
    }

    /// Look up a footprint; unknown kinds get the default with a warning
    pub fn spec(&self, kind: &BlockKind) -> BlockSpec {
        match self.specs.get(kind) {
            Some(spec) => spec.clone(),
            None => {
                log::warn!("Unknown block type {}, using default footprint", kind.name());
                BlockSpec::fallback(kind)
            }
        }
    }

    pub fn depth(&self, kind: &BlockKind) -> f32 {
        self.spec(kind).depth
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.register(BlockSpec::new(BlockKind::Start, 5.5, 5.5));
        catalog.register(BlockSpec::new(BlockKind::Spinner, 5.5, 5.5));
        catalog.register(BlockSpec::new(BlockKind::Limbo, 4.0, 5.5));
        catalog.register(BlockSpec::new(BlockKind::Axe, 9.0, 5.5));
        catalog.register(BlockSpec::new(BlockKind::End, 5.5, 5.5));
        catalog
    }
}
